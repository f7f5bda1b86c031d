pub mod adapters;
pub mod game;
pub mod types;

pub use adapters::*;
pub use game::*;
pub use types::*;

pub mod alpha_beta;
pub mod config;
pub mod counter_move;
pub mod move_picker;
pub mod ordering;
pub mod parallel;
pub mod transposition_table;

pub use alpha_beta::*;
pub use config::*;
pub use counter_move::*;
pub use move_picker::*;
pub use ordering::*;
pub use parallel::*;
pub use transposition_table::*;

// Ficheiro: src/moves/mod.rs
// Descrição: Contentores e geradores de lances consumidos pelo seletor de lances.

pub mod generator;
pub mod move_list;

pub use generator::*;
pub use move_list::*;

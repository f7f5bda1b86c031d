// Jogos de exemplo que implementam o contrato do motor

pub mod repeat;

pub use repeat::*;

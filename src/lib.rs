// BoardGame AI - motor genérico de busca para jogos de dois jogadores

pub mod core;
pub mod engine;
pub mod error;
pub mod games;
pub mod moves;
pub mod search;

pub use crate::core::*;
pub use error::{ConfigError, GameError};

//! Erros de configuração do motor e de lances vindos de fora.
//!
//! A busca em si não falha: o fim dos lances é a sentinela do jogo e as
//! violações de contrato são asserções de debug.

use crate::core::Move;
use thiserror::Error;

/// Configuração do motor ou da busca rejeitada
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("transposition table enabled with a size of 0 MB")]
    ZeroTableSize,

    #[error("transposition table of {size_mb} MB does not fit in memory")]
    TableTooLarge { size_mb: usize },

    #[error("maximum search depth must be at least 1")]
    ZeroDepth,

    #[error("at least one search thread is required")]
    ZeroThreads,
}

/// Lance recusado pelas regras do jogo
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move {mv}: {reason}")]
    IllegalMove { mv: Move, reason: String },

    #[error("unknown move {0}")]
    UnknownMove(Move),

    #[error("the game is already over")]
    GameOver,

    #[error("cannot parse move from {0:?}")]
    Parse(String),
}

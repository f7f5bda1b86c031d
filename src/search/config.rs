// Configuração do motor: opções resolvidas em tempo de compilação + limites por busca

use super::alpha_beta::Engine;
use super::counter_move::CounterMoveTable;
use super::transposition_table::TranspositionTable;
use crate::core::*;
use crate::error::ConfigError;
use std::marker::PhantomData;
use std::time::Duration;

/// Tamanho da tabela de transposição por omissão, em MB
pub const DEFAULT_TT_SIZE_MB: usize = 64;

/// Limites de uma chamada de busca
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: Depth,
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(max_depth: Depth) -> Self {
        SearchLimits {
            max_depth,
            time_limit: None,
        }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits::depth(20)
    }
}

/// Monta um [`Engine`] a partir das opções ligadas.
///
/// Cada opção é um parâmetro const do tipo do motor, por isso o ciclo de
/// busca é compilado uma vez por combinação, sem testes em tempo de execução:
///
/// ```
/// use boardgame_ai::games::SmallRepeatGame;
/// use boardgame_ai::search::EngineBuilder;
///
/// let mut engine = EngineBuilder::<SmallRepeatGame>::new()
///     .iterative_deepening()
///     .transposition_table(1)
///     .build()
///     .unwrap();
/// let mut game = SmallRepeatGame::new();
/// let result = engine.search(&mut game, 4);
/// assert!(result.depth <= 4);
/// ```
pub struct EngineBuilder<G, const ID: bool = false, const TT: bool = false, const CM: bool = false> {
    tt_size_mb: usize,
    _game: PhantomData<fn() -> G>,
}

impl<G: Game> EngineBuilder<G> {
    pub fn new() -> Self {
        EngineBuilder {
            tt_size_mb: DEFAULT_TT_SIZE_MB,
            _game: PhantomData,
        }
    }
}

impl<G: Game> Default for EngineBuilder<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game, const ID: bool, const TT: bool, const CM: bool> EngineBuilder<G, ID, TT, CM> {
    pub fn iterative_deepening(self) -> EngineBuilder<G, true, TT, CM> {
        EngineBuilder {
            tt_size_mb: self.tt_size_mb,
            _game: PhantomData,
        }
    }

    pub fn transposition_table(self, size_mb: usize) -> EngineBuilder<G, ID, true, CM> {
        EngineBuilder {
            tt_size_mb: size_mb,
            _game: PhantomData,
        }
    }

    pub fn counter_moves(self) -> EngineBuilder<G, ID, TT, true> {
        EngineBuilder {
            tt_size_mb: self.tt_size_mb,
            _game: PhantomData,
        }
    }

    pub fn build(&self) -> Result<Engine<G, ID, TT, CM>, ConfigError> {
        let tt = if TT {
            if self.tt_size_mb == 0 {
                return Err(ConfigError::ZeroTableSize);
            }
            let fits = self
                .tt_size_mb
                .checked_mul(1024 * 1024)
                .is_some_and(|bytes| bytes <= isize::MAX as usize);
            if !fits {
                return Err(ConfigError::TableTooLarge {
                    size_mb: self.tt_size_mb,
                });
            }
            log::debug!(
                "transposition table: {} MB, {} entries",
                self.tt_size_mb,
                TranspositionTable::entries_for(self.tt_size_mb)
            );
            Some(TranspositionTable::new(self.tt_size_mb))
        } else {
            None
        };

        let counter_moves = if CM {
            Some(CounterMoveTable::for_game::<G>())
        } else {
            None
        };

        Ok(Engine::from_parts(tt, counter_moves))
    }
}

impl<G, const ID: bool, const TT: bool, const CM: bool> Clone for EngineBuilder<G, ID, TT, CM> {
    fn clone(&self) -> Self {
        EngineBuilder {
            tt_size_mb: self.tt_size_mb,
            _game: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::SmallRepeatGame;

    #[test]
    fn test_zero_sized_table_is_rejected() {
        let result = EngineBuilder::<SmallRepeatGame>::new().transposition_table(0).build();
        assert_eq!(result.err(), Some(ConfigError::ZeroTableSize));
    }

    #[test]
    fn test_huge_table_is_rejected() {
        let result = EngineBuilder::<SmallRepeatGame>::new()
            .transposition_table(usize::MAX)
            .build();
        assert!(matches!(result, Err(ConfigError::TableTooLarge { .. })));
    }

    #[test]
    fn test_tables_follow_toggles() {
        let plain = EngineBuilder::<SmallRepeatGame>::new().build().unwrap();
        assert!(plain.transposition_table().is_none());
        assert!(plain.counter_move_table().is_none());

        let full = EngineBuilder::<SmallRepeatGame>::new()
            .iterative_deepening()
            .transposition_table(1)
            .counter_moves()
            .build()
            .unwrap();
        assert!(full.transposition_table().is_some());
        assert_eq!(
            full.counter_move_table().map(|t| t.len()),
            Some(SmallRepeatGame::COUNTER_MOVE_STATES)
        );
    }

    #[test]
    fn test_limits_validation() {
        assert_eq!(SearchLimits::depth(0).validate(), Err(ConfigError::ZeroDepth));
        assert!(SearchLimits::depth(3).validate().is_ok());
        let limits = SearchLimits::depth(3).with_time_limit(Duration::from_millis(5));
        assert_eq!(limits.time_limit, Some(Duration::from_millis(5)));
    }
}

// Adaptadores que trocam a estratégia de ordenação de um jogo que suporta as duas.

use super::game::*;
use super::types::*;
use crate::moves::{MoveGenerator, MoveList};
use crate::search::ordering::{LazyOrdering, StaticOrdering};

/// Expõe `G` com ordenação estática (lista completa, seleção parcial)
#[derive(Debug, Clone, Default)]
pub struct Eager<G>(pub G);

/// Expõe `G` com ordenação preguiçosa (gerador a pedido)
#[derive(Debug, Clone, Default)]
pub struct Lazy<G>(pub G);

/// Gerador de `G` usado através do invólucro
#[derive(Debug, Clone)]
pub struct Delegated<M>(M);

macro_rules! delegate_game {
    ($wrapper:ident, $bound:ident, $ordering:ty) => {
        impl<G: $bound> Game for $wrapper<G> {
            const NO_MOVE: Move = G::NO_MOVE;
            const COUNTER_MOVE_STATES: usize = G::COUNTER_MOVE_STATES;
            const COUNTER_MOVE_BIAS: Score = G::COUNTER_MOVE_BIAS;

            type Ordering = $ordering;

            fn position_hash(&self) -> u64 {
                self.0.position_hash()
            }

            fn make_move(&mut self, mv: Move) {
                self.0.make_move(mv)
            }

            fn undo_move(&mut self) {
                self.0.undo_move()
            }

            fn is_game_over(&self) -> bool {
                self.0.is_game_over()
            }

            fn evaluate(&self) -> Value {
                self.0.evaluate()
            }

            fn max_possible_evaluation(&self) -> Value {
                self.0.max_possible_evaluation()
            }

            fn current_player(&self) -> Player {
                self.0.current_player()
            }

            fn map_last_move_to_counter_move_state(&self) -> usize {
                self.0.map_last_move_to_counter_move_state()
            }

            fn clear(&mut self) {
                self.0.clear()
            }
        }
    };
}

delegate_game!(Eager, StaticMoves, StaticOrdering);
delegate_game!(Lazy, LazyMoves, LazyOrdering<Delegated<G::Generator>>);

impl<G: StaticMoves> StaticMoves for Eager<G> {
    fn moves(&self, out: &mut MoveList) {
        self.0.moves(out)
    }
}

impl<G: LazyMoves> LazyMoves for Lazy<G> {
    type Generator = Delegated<G::Generator>;

    fn move_generator(&self) -> Self::Generator {
        Delegated(self.0.move_generator())
    }
}

impl<G: LazyMoves> MoveGenerator<Lazy<G>> for Delegated<G::Generator> {
    fn next_move(&mut self, game: &Lazy<G>) -> Move {
        self.0.next_move(&game.0)
    }
}

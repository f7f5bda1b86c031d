//! Seletor de lances por fases.
//!
//! Entrega os lances legais de um nó pela ordem de prioridade:
//! 1. Lance da TT (se houver um guardado para esta posição)
//! 2. Todos os outros, pela estratégia de ordenação do jogo
//!
//! O lance da TT não é validado de novo; é suprimido pelo valor quando
//! reaparece no resto dos lances, por isso nenhum lance sai duas vezes.

use super::counter_move::CounterMoveTable;
use super::ordering::MoveSource;
use crate::core::{Game, Move};

/// Fase do seletor, só avança
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Entregar o lance da TT
    TtMove,
    /// Preparar a origem dos lances no próximo pedido
    GenerateMoves,
    /// Tirar lances da origem até se esgotar
    MoveList,
}

/// Seletor de lances de uma posição.
///
/// `next_move` recebe o jogo (e a tabela de contra-lances, quando o motor a
/// usa) em cada chamada; ambos têm de descrever a posição para a qual o
/// seletor foi criado. Nunca reutilizar um seletor entre make/undo.
pub struct MovePicker<G: Game> {
    tt_move: Move,
    stage: Stage,
    source: Option<G::Ordering>,
}

impl<G: Game> MovePicker<G> {
    pub fn new(tt_move: Move) -> Self {
        let stage = if tt_move == G::NO_MOVE {
            Stage::GenerateMoves
        } else {
            Stage::TtMove
        };
        MovePicker {
            tt_move,
            stage,
            source: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn tt_move(&self) -> Move {
        self.tt_move
    }

    /// Próximo lance, ou `G::NO_MOVE` quando já saíram todos (e daí em diante)
    pub fn next_move(&mut self, game: &G, counter_moves: Option<&CounterMoveTable>) -> Move {
        loop {
            match self.stage {
                Stage::TtMove => {
                    self.stage = Stage::GenerateMoves;
                    return self.tt_move;
                }

                Stage::GenerateMoves => {
                    let counter_move = match counter_moves {
                        Some(table) => table.counter_move(game),
                        None => G::NO_MOVE,
                    };
                    self.source = Some(G::Ordering::initialize(game, counter_move));
                    self.stage = Stage::MoveList;
                }

                Stage::MoveList => {
                    let Some(source) = self.source.as_mut() else {
                        return G::NO_MOVE;
                    };
                    loop {
                        let mv = source.pick_best(game);
                        if mv == G::NO_MOVE {
                            return G::NO_MOVE;
                        }
                        if mv != self.tt_move {
                            return mv;
                        }
                    }
                }
            }
        }
    }
}

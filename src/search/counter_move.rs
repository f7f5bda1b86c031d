//! Heurística de contra-lance para a ordenação.
//!
//! Guarda, por estado atingido pelo último lance do adversário, uma resposta
//! que causou um corte recentemente. Só influencia a ordem dos lances, nunca
//! a legalidade nem os valores.

use crate::core::{Game, Move};

/// Tabela de contra-lances: `índice do estado -> resposta`, a última escrita ganha
#[derive(Clone, Debug)]
pub struct CounterMoveTable {
    table: Vec<Move>,
    no_move: Move,
}

impl CounterMoveTable {
    /// Reserva `states` entradas, todas a `no_move`
    pub fn new(states: usize, no_move: Move) -> Self {
        CounterMoveTable {
            table: vec![no_move; states],
            no_move,
        }
    }

    /// Tabela com o tamanho do espaço de estados de `G`
    pub fn for_game<G: Game>() -> Self {
        Self::new(G::COUNTER_MOVE_STATES, G::NO_MOVE)
    }

    /// Resposta guardada para `state`, ou a sentinela
    #[inline(always)]
    pub fn lookup(&self, state: usize) -> Move {
        debug_assert!(state < self.table.len(), "counter-move state {state} out of range");
        self.table[state]
    }

    #[inline(always)]
    pub fn record(&mut self, state: usize, mv: Move) {
        debug_assert!(state < self.table.len(), "counter-move state {state} out of range");
        self.table[state] = mv;
    }

    /// Resposta guardada para a posição atual de `game`
    #[inline(always)]
    pub fn counter_move<G: Game>(&self, game: &G) -> Move {
        self.lookup(game.map_last_move_to_counter_move_state())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Número de estados com resposta
    pub fn filled(&self) -> usize {
        self.table.iter().filter(|&&mv| mv != self.no_move).count()
    }

    /// Esquece todas as respostas (novo jogo, não nova busca)
    pub fn clear(&mut self) {
        let no_move = self.no_move;
        self.table.iter_mut().for_each(|mv| *mv = no_move);
    }
}

use crate::core::*;
use crate::moves::{MoveGenerator, MoveList};

/// Origem dos lances que o seletor entrega depois do lance da TT.
///
/// `initialize` corre uma vez por nó, no primeiro pedido depois do lance da
/// TT. `pick_best` devolve o próximo lance ou `G::NO_MOVE` quando não há
/// mais, e a partir daí continua a devolver `G::NO_MOVE`.
pub trait MoveSource<G: Game + ?Sized>: Sized {
    fn initialize(game: &G, counter_move: Move) -> Self;

    fn pick_best(&mut self, game: &G) -> Move;
}

// ============================================================================
// ORDENAÇÃO ESTÁTICA (lista completa + seleção parcial)
// ============================================================================

/// Lista completa com as heurísticas do jogo, ordenada aos poucos: cada
/// pedido procura o máximo no sufixo ainda não entregue e troca-o para a
/// posição atual. Só se ordena o que a busca consome.
#[derive(Debug, Clone, Default)]
pub struct StaticOrdering {
    moves: MoveList,
    cursor: usize,
}

impl StaticOrdering {
    /// Soma o bónus de contra-lance à primeira entrada igual a
    /// `counter_move`; devolve se encontrou alguma
    pub fn apply_counter_move(&mut self, counter_move: Move, bias: Score) -> bool {
        for ext in self.moves.as_mut_slice().iter_mut() {
            if ext.mv == counter_move {
                ext.value = ext.value.saturating_add(bias);
                return true;
            }
        }
        false
    }

    /// Lances ainda por entregar
    pub fn remaining(&self) -> usize {
        self.moves.len() - self.cursor
    }

    pub fn moves(&self) -> &MoveList {
        &self.moves
    }

    /// Próxima entrada da seleção parcial; empates mantêm a ordem da lista
    fn select_next(&mut self) -> Option<ExtMove> {
        let cursor = self.cursor;
        let slice = self.moves.as_mut_slice();
        if cursor >= slice.len() {
            return None;
        }

        let mut best = cursor;
        for i in (cursor + 1)..slice.len() {
            if slice[i].value > slice[best].value {
                best = i;
            }
        }
        slice.swap(cursor, best);
        self.cursor += 1;
        Some(slice[cursor])
    }
}

impl<G: StaticMoves> MoveSource<G> for StaticOrdering {
    fn initialize(game: &G, counter_move: Move) -> Self {
        let mut ordering = StaticOrdering {
            moves: MoveList::new(),
            cursor: 0,
        };
        game.moves(&mut ordering.moves);

        if counter_move != G::NO_MOVE {
            ordering.apply_counter_move(counter_move, G::COUNTER_MOVE_BIAS);
        }
        ordering
    }

    #[inline]
    fn pick_best(&mut self, _game: &G) -> Move {
        match self.select_next() {
            Some(ext) => ext.mv,
            None => G::NO_MOVE,
        }
    }
}

// ============================================================================
// ORDENAÇÃO PREGUIÇOSA (gerador sob demanda)
// ============================================================================

/// Lances direto do gerador do jogo, sem lista nem valores. Depois de o
/// gerador se esgotar nunca mais é chamado.
#[derive(Debug, Clone)]
pub struct LazyOrdering<M> {
    generator: M,
    exhausted: bool,
}

impl<M> LazyOrdering<M> {
    pub fn new(generator: M) -> Self {
        LazyOrdering {
            generator,
            exhausted: false,
        }
    }
}

impl<G: LazyMoves> MoveSource<G> for LazyOrdering<G::Generator> {
    fn initialize(game: &G, _counter_move: Move) -> Self {
        LazyOrdering::new(game.move_generator())
    }

    #[inline]
    fn pick_best(&mut self, game: &G) -> Move {
        if self.exhausted {
            return G::NO_MOVE;
        }
        let mv = self.generator.next_move(game);
        if mv == G::NO_MOVE {
            self.exhausted = true;
        }
        mv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_selection_order() {
        let mut ordering = StaticOrdering::default();
        ordering.moves.add_move(Move(1), 3);
        ordering.moves.add_move(Move(2), 9);
        ordering.moves.add_move(Move(3), 1);

        let picked: Vec<Move> = std::iter::from_fn(|| ordering.select_next().map(|e| e.mv)).collect();
        assert_eq!(picked, vec![Move(2), Move(1), Move(3)]);
        assert_eq!(ordering.remaining(), 0);
        assert!(ordering.select_next().is_none());
    }

    #[test]
    fn test_ties_keep_first_entry() {
        let mut ordering = StaticOrdering::default();
        for id in 1..=3 {
            ordering.moves.add_move(Move(id), 5);
        }
        assert_eq!(ordering.select_next().map(|e| e.mv), Some(Move(1)));
    }

    #[test]
    fn test_counter_move_bias_only_first_match() {
        let mut ordering = StaticOrdering::default();
        ordering.moves.add_move(Move(4), 0);
        ordering.moves.add_move(Move(4), 0);
        assert!(ordering.apply_counter_move(Move(4), 100));
        let values: Vec<Score> = ordering.moves().iter().map(|e| e.value).collect();
        assert_eq!(values, vec![100, 0]);
        assert!(!ordering.apply_counter_move(Move(8), 100));
    }

    #[test]
    fn test_bias_saturates() {
        let mut ordering = StaticOrdering::default();
        ordering.moves.add_move(Move(1), Score::MAX - 1);
        ordering.apply_counter_move(Move(1), 100);
        assert_eq!(ordering.moves().last_move().map(|e| e.value), Some(Score::MAX));
    }
}

// Ficheiro: src/moves/move_list.rs
// Descrição: Lista de lances com valor heurístico, preenchida pelos jogos.

use crate::core::types::{ExtMove, Move, Score, NEUTRAL_SCORE};

/// Limite típico de lances por posição; só indica a capacidade inicial
pub const MOVE_LIST_CAPACITY: usize = 64;

/// Lances de uma posição, todos gerados de uma vez.
///
/// Só cresce, exceto `undo_move`, que tira a última entrada. Nunca se
/// removem entradas do meio e o lance de uma entrada nunca muda, só o seu
/// valor heurístico.
#[derive(Debug, Clone, Default)]
pub struct MoveList {
    moves: Vec<ExtMove>,
}

impl MoveList {
    pub fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(MOVE_LIST_CAPACITY),
        }
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    #[inline(always)]
    pub fn add_move(&mut self, mv: Move, value: Score) {
        self.moves.push(ExtMove::new(mv, value));
    }

    /// Junta com o valor heurístico neutro
    #[inline(always)]
    pub fn push(&mut self, mv: Move) {
        self.add_move(mv, NEUTRAL_SCORE);
    }

    /// Remove a última entrada
    #[inline(always)]
    pub fn undo_move(&mut self) -> Option<ExtMove> {
        self.moves.pop()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Última entrada, sem a remover
    #[inline(always)]
    pub fn last_move(&self) -> Option<&ExtMove> {
        self.moves.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtMove> {
        self.moves.iter()
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.moves.iter().any(|ext| ext.mv == mv)
    }

    /// Acesso para a ordenação: pode trocar entradas e ajustar valores,
    /// mais nada
    #[inline(always)]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [ExtMove] {
        &mut self.moves
    }
}

impl std::fmt::Display for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for ext in &self.moves {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", ext.mv)?;
            first = false;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a ExtMove;
    type IntoIter = std::slice::Iter<'a, ExtMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_undo() {
        let mut list = MoveList::new();
        list.add_move(Move(1), 10);
        list.push(Move(2));
        assert_eq!(list.len(), 2);
        assert_eq!(list.last_move().map(|e| e.mv), Some(Move(2)));
        assert_eq!(list.last_move().map(|e| e.value), Some(NEUTRAL_SCORE));

        let undone = list.undo_move();
        assert_eq!(undone, Some(ExtMove::new(Move(2), NEUTRAL_SCORE)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.last_move().map(|e| e.mv), Some(Move(1)));
    }

    #[test]
    fn test_clear() {
        let mut list = MoveList::new();
        list.push(Move(4));
        list.push(Move(5));
        list.clear();
        assert!(list.is_empty());
        assert!(list.last_move().is_none());
        assert!(list.undo_move().is_none());
    }

    #[test]
    fn test_display_and_contains() {
        let mut list = MoveList::new();
        list.add_move(Move(3), 1);
        list.add_move(Move(1), 2);
        assert_eq!(list.to_string(), "3 1");
        assert!(list.contains(Move(1)));
        assert!(!list.contains(Move(2)));
    }
}

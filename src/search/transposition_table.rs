// Transposition Table de tamanho fixo com substituição por profundidade e geração

use crate::core::*;

/// Tipo de limite do valor guardado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,      // Score exato
    LowerBound, // Score >= beta (fail-high)
    UpperBound, // Score <= alpha (fail-low)
}

/// Um resultado de busca guardado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub best_move: Move,
    pub value: Value,
    pub depth: Depth,
    pub bound: Bound,
    pub generation: u8,
    /// A subárvore foi explorada até às posições terminais: o valor vale
    /// para qualquer profundidade
    pub complete: bool,
}

impl TTEntry {
    /// Valor utilizável neste nó: exato, ou um limite que já decide a
    /// janela (alpha, beta)
    pub fn cutoff_value(&self, depth: Depth, alpha: Value, beta: Value) -> Option<Value> {
        if !self.complete && self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.value),
            Bound::LowerBound if self.value >= beta => Some(self.value),
            Bound::UpperBound if self.value <= alpha => Some(self.value),
            _ => None,
        }
    }
}

/// Tabela pré-alocada, com tamanho potência de dois, indexada pelo hash da
/// posição. Pertence só ao motor que a criou.
pub struct TranspositionTable {
    slots: Vec<Option<TTEntry>>,
    mask: usize,
    generation: u8,
    hits: u64,
    misses: u64,
}

impl TranspositionTable {
    /// Entradas que cabem em `size_mb` MB, arredondadas para baixo a uma potência de dois
    pub fn entries_for(size_mb: usize) -> usize {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let entries = size_mb.saturating_mul(1024 * 1024) / entry_size;
        if entries == 0 {
            1
        } else {
            1usize << (usize::BITS - 1 - entries.leading_zeros())
        }
    }

    /// Cria nova TT com tamanho em MB
    pub fn new(size_mb: usize) -> Self {
        Self::with_entries(Self::entries_for(size_mb))
    }

    /// `entries` arredondado para baixo a uma potência de dois (pelo menos uma)
    pub fn with_entries(entries: usize) -> Self {
        let entries = entries.max(1);
        let size = 1usize << (usize::BITS - 1 - entries.leading_zeros());
        TranspositionTable {
            slots: vec![None; size],
            mask: size - 1,
            generation: 0,
            hits: 0,
            misses: 0,
        }
    }

    #[inline(always)]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Busca entrada na TT
    pub fn probe(&mut self, hash: u64) -> Option<TTEntry> {
        match self.slots[self.index(hash)] {
            Some(entry) if entry.key == hash => {
                self.hits += 1;
                Some(entry)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Melhor lance guardado para `hash`, sem mexer nas estatísticas
    pub fn best_move(&self, hash: u64) -> Option<Move> {
        match self.slots[self.index(hash)] {
            Some(entry) if entry.key == hash => Some(entry.best_move),
            _ => None,
        }
    }

    /// Armazena entrada na TT com política de substituição
    pub fn store(
        &mut self,
        hash: u64,
        depth: Depth,
        value: Value,
        bound: Bound,
        best_move: Move,
        complete: bool,
    ) {
        let index = self.index(hash);
        let generation = self.generation;

        let should_replace = match self.slots[index] {
            None => true,
            Some(current) => {
                current.key != hash
                    || current.generation != generation
                    || (complete && !current.complete)
                    || (depth >= current.depth && (complete || !current.complete))
            }
        };

        if should_replace {
            self.slots[index] = Some(TTEntry {
                key: hash,
                best_move,
                value,
                depth,
                bound,
                generation,
                complete,
            });
        }
    }

    /// Limpa a TT
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.generation = 0;
        self.hits = 0;
        self.misses = 0;
    }

    /// Incrementa idade para política de substituição
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        let probes = self.hits + self.misses;
        if probes == 0 {
            0.0
        } else {
            self.hits as f64 / probes as f64
        }
    }

    /// Ocupação em permilagem, amostrada em no máximo 1000 posições
    pub fn usage(&self) -> u64 {
        let size = self.slots.len();
        let sample_size = size.min(1000);
        let used = (0..sample_size)
            .filter(|&i| self.slots[i * size / sample_size].is_some())
            .count();
        (used as u64 * 1000) / sample_size as u64
    }
}

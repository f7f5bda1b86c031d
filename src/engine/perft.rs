// Perft: contagem de folhas da árvore de jogo, percorrida pelo seletor de lances

use crate::core::*;
use crate::search::MovePicker;
use rayon::prelude::*;
use std::collections::HashMap;

/// Contagens já feitas, por (hash da posição, profundidade restante).
///
/// O hash tem de identificar a posição inteira (no jogo de números inclui o
/// conjunto de números já usados), senão transposições diferentes misturam-se.
#[derive(Debug, Default)]
pub struct PerftCache {
    counts: HashMap<(u64, Depth), u64>,
    probes: u64,
    hits: u64,
}

impl PerftCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&mut self, hash: u64, depth: Depth) -> Option<u64> {
        self.probes += 1;
        let nodes = self.counts.get(&(hash, depth)).copied();
        self.hits += u64::from(nodes.is_some());
        nodes
    }

    fn remember(&mut self, hash: u64, depth: Depth, nodes: u64) {
        self.counts.insert((hash, depth), nodes);
    }

    /// Posições distintas guardadas
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.hits as f64 / self.probes as f64
        }
    }
}

/// Lances da posição atual, pela ordem do seletor
fn picker_moves<G: Game>(game: &G) -> Vec<Move> {
    let mut picker = MovePicker::<G>::new(G::NO_MOVE);
    let mut moves = Vec::new();
    loop {
        let mv = picker.next_move(game, None);
        if mv == G::NO_MOVE {
            return moves;
        }
        moves.push(mv);
    }
}

/// Número de posições exatamente `depth` meios-lances abaixo da atual
pub fn perft<G: Game>(game: &mut G, depth: Depth) -> u64 {
    if depth == 0 {
        return 1;
    }
    if game.is_game_over() {
        return 0;
    }

    let mut nodes = 0;
    let mut picker = MovePicker::<G>::new(G::NO_MOVE);
    loop {
        let mv = picker.next_move(game, None);
        if mv == G::NO_MOVE {
            break;
        }
        if depth == 1 {
            nodes += 1;
            continue;
        }
        game.make_move(mv);
        nodes += perft(game, depth - 1);
        game.undo_move();
    }
    nodes
}

/// Perft dividido por lance da raiz
pub fn perft_divide<G: Game>(game: &mut G, depth: Depth) -> Vec<(Move, u64)> {
    if depth == 0 || game.is_game_over() {
        return Vec::new();
    }
    picker_moves(game)
        .into_iter()
        .map(|mv| {
            game.make_move(mv);
            let nodes = perft(game, depth - 1);
            game.undo_move();
            (mv, nodes)
        })
        .collect()
}

/// Perft com cache de transposições
pub fn perft_cached<G: Game>(game: &mut G, depth: Depth, cache: &mut PerftCache) -> u64 {
    if depth == 0 {
        return 1;
    }
    if game.is_game_over() {
        return 0;
    }

    let hash = game.position_hash();
    if let Some(nodes) = cache.lookup(hash, depth) {
        return nodes;
    }

    let mut nodes = 0;
    let mut picker = MovePicker::<G>::new(G::NO_MOVE);
    loop {
        let mv = picker.next_move(game, None);
        if mv == G::NO_MOVE {
            break;
        }
        game.make_move(mv);
        nodes += perft_cached(game, depth - 1, cache);
        game.undo_move();
    }

    cache.remember(hash, depth, nodes);
    nodes
}

/// Perft paralelo: cada lance da raiz numa tarefa rayon com a sua cópia do jogo
pub fn perft_parallel<G: Game + Sync>(game: &G, depth: Depth) -> u64 {
    if depth == 0 {
        return 1;
    }
    if game.is_game_over() {
        return 0;
    }
    picker_moves(game)
        .into_par_iter()
        .map(|mv| {
            let mut local = game.clone();
            local.make_move(mv);
            perft(&mut local, depth - 1)
        })
        .sum()
}

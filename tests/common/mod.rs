// Árvores de jogo aleatórias (semente fixa) que expõem as duas estratégias de ordenação

#![allow(dead_code)]

use boardgame_ai::moves::{MoveGenerator, MoveList};
use boardgame_ai::search::StaticOrdering;
use boardgame_ai::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub const MAX_MOVE_ID: usize = 60;

#[derive(Debug, Clone)]
pub struct Node {
    pub moves: Vec<(Move, Score, usize)>,
    pub eval: Value,
}

/// Árvore de jogo explícita; a posição é o caminho de índices desde a raiz
#[derive(Debug, Clone)]
pub struct RandomTree {
    nodes: Arc<Vec<Node>>,
    path: Vec<usize>,
}

impl RandomTree {
    pub fn generate(seed: u64, max_depth: usize, max_branching: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut nodes = Vec::new();
        build(&mut rng, &mut nodes, max_depth, max_branching);
        RandomTree {
            nodes: Arc::new(nodes),
            path: vec![0],
        }
    }

    /// Posição única com os lances `(id, heurística)` dados, todos para folhas
    pub fn flat(moves: &[(u32, Score)]) -> Self {
        let mut nodes = vec![Node {
            moves: Vec::new(),
            eval: 0,
        }];
        for &(id, value) in moves {
            let child = nodes.len();
            nodes[0].moves.push((Move(id), value, child));
            nodes.push(Node {
                moves: Vec::new(),
                eval: id as Value,
            });
        }
        RandomTree {
            nodes: Arc::new(nodes),
            path: vec![0],
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// A mesma árvore, posicionada no nó `index`
    pub fn at(&self, index: usize) -> Self {
        RandomTree {
            nodes: Arc::clone(&self.nodes),
            path: vec![index],
        }
    }

    fn current(&self) -> &Node {
        &self.nodes[*self.path.last().unwrap_or(&0)]
    }

    pub fn legal(&self) -> Vec<Move> {
        self.current().moves.iter().map(|&(mv, _, _)| mv).collect()
    }

    /// Negamax simples sobre a subárvore inteira
    pub fn minimax(&mut self, depth: Depth) -> Value {
        if self.is_game_over() || depth == 0 {
            return self.evaluate();
        }
        let mut best = -VALUE_INFINITE;
        for mv in self.legal() {
            self.make_move(mv);
            best = best.max(-self.minimax(depth - 1));
            self.undo_move();
        }
        best
    }
}

fn build(rng: &mut StdRng, nodes: &mut Vec<Node>, depth: usize, max_branching: usize) -> usize {
    let index = nodes.len();
    nodes.push(Node {
        moves: Vec::new(),
        eval: rng.gen_range(-1000..=1000),
    });
    if depth == 0 {
        return index;
    }
    let branching = rng.gen_range(0..=max_branching);
    let ids = rand::seq::index::sample(rng, MAX_MOVE_ID, branching);
    for id in ids.into_iter() {
        let value = rng.gen_range(0..10);
        let child = build(rng, nodes, depth - 1, max_branching);
        nodes[index].moves.push((Move(id as u32 + 1), value, child));
    }
    index
}

pub struct TreeGenerator {
    index: usize,
}

impl MoveGenerator<RandomTree> for TreeGenerator {
    fn next_move(&mut self, game: &RandomTree) -> Move {
        match game.current().moves.get(self.index) {
            Some(&(mv, _, _)) => {
                self.index += 1;
                mv
            }
            None => RandomTree::NO_MOVE,
        }
    }
}

impl Game for RandomTree {
    const NO_MOVE: Move = Move(0);
    const COUNTER_MOVE_STATES: usize = MAX_MOVE_ID + 1;
    type Ordering = StaticOrdering;

    fn position_hash(&self) -> u64 {
        (*self.path.last().unwrap_or(&0) as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    fn make_move(&mut self, mv: Move) {
        let child = self
            .current()
            .moves
            .iter()
            .find(|&&(m, _, _)| m == mv)
            .map(|&(_, _, child)| child)
            .expect("illegal move in random tree");
        self.path.push(child);
    }

    fn undo_move(&mut self) {
        self.path.pop();
    }

    fn is_game_over(&self) -> bool {
        self.current().moves.is_empty()
    }

    fn evaluate(&self) -> Value {
        self.current().eval
    }

    fn max_possible_evaluation(&self) -> Value {
        1000
    }

    fn current_player(&self) -> Player {
        if self.path.len() % 2 == 1 {
            Player::First
        } else {
            Player::Second
        }
    }

    fn map_last_move_to_counter_move_state(&self) -> usize {
        if self.path.len() < 2 {
            return 0;
        }
        let parent = &self.nodes[self.path[self.path.len() - 2]];
        let here = *self.path.last().unwrap_or(&0);
        parent
            .moves
            .iter()
            .find(|&&(_, _, child)| child == here)
            .map(|&(mv, _, _)| mv.id() as usize)
            .unwrap_or(0)
    }

    fn clear(&mut self) {
        self.path.truncate(1);
    }
}

impl StaticMoves for RandomTree {
    fn moves(&self, out: &mut MoveList) {
        for &(mv, value, _) in &self.current().moves {
            out.add_move(mv, value);
        }
    }
}

impl LazyMoves for RandomTree {
    type Generator = TreeGenerator;

    fn move_generator(&self) -> TreeGenerator {
        TreeGenerator { index: 0 }
    }
}

/// Esgota um seletor novo
pub fn drain<G: Game>(
    game: &G,
    tt_move: Move,
    counter_moves: Option<&boardgame_ai::search::CounterMoveTable>,
) -> Vec<Move> {
    let mut picker = boardgame_ai::search::MovePicker::<G>::new(tt_move);
    let mut out = Vec::new();
    loop {
        let mv = picker.next_move(game, counter_moves);
        if mv == G::NO_MOVE {
            return out;
        }
        out.push(mv);
    }
}

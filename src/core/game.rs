// Ficheiro: src/core/game.rs
// Descrição: Contrato entre o motor de busca e as regras de um jogo concreto.

use super::types::*;
use crate::moves::{MoveGenerator, MoveList};
use crate::search::ordering::MoveSource;

/// Jogo determinista de dois jogadores com informação perfeita, visto pelo motor.
///
/// A posição muda no próprio objeto: os pares `make_move` / `undo_move` têm
/// de estar estritamente encaixados. `evaluate` é sempre do ponto de vista
/// de quem joga (convenção negamax).
pub trait Game: Clone {
    /// Sentinela reservada, nunca é um lance real
    const NO_MOVE: Move;

    /// Tamanho do espaço de índices devolvido por
    /// [`map_last_move_to_counter_move_state`](Game::map_last_move_to_counter_move_state).
    const COUNTER_MOVE_STATES: usize;

    /// Bónus do contra-lance na ordenação estática. Tem de ser afinado para a
    /// escala das heurísticas do jogo.
    const COUNTER_MOVE_BIAS: Score = 100;

    /// Estratégia de ordenação do seletor, fixa por tipo de jogo
    type Ordering: MoveSource<Self>;

    #[inline(always)]
    fn no_move_value() -> Move {
        Self::NO_MOVE
    }

    fn position_hash(&self) -> u64;

    fn make_move(&mut self, mv: Move);

    fn undo_move(&mut self);

    fn is_game_over(&self) -> bool;

    fn evaluate(&self) -> Value;

    /// Maior valor absoluto que `evaluate` pode devolver. A raiz deixa de
    /// procurar quando um lance o atinge.
    fn max_possible_evaluation(&self) -> Value;

    fn current_player(&self) -> Player;

    /// Índice determinista (`< COUNTER_MOVE_STATES`) que descreve o lance
    /// acabado de jogar
    fn map_last_move_to_counter_move_state(&self) -> usize;

    /// Volta à posição inicial
    fn clear(&mut self);
}

/// Jogos que produzem todos os lances legais com um valor heurístico
pub trait StaticMoves: Game {
    fn moves(&self, out: &mut MoveList);
}

/// Jogos que dão um gerador, só para a frente, dos lances legais
pub trait LazyMoves: Game {
    type Generator: MoveGenerator<Self>;

    fn move_generator(&self) -> Self::Generator;
}

/// Lances legais de `game` pela ordem em que o próprio jogo os enumera.
/// Para testes e ferramentas; a busca não o usa.
pub fn legal_moves<G: StaticMoves>(game: &G) -> Vec<Move> {
    let mut list = MoveList::new();
    game.moves(&mut list);
    list.iter().map(|ext| ext.mv).collect()
}

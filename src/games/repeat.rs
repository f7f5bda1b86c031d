// Ficheiro: src/games/repeat.rs
// Descrição: Jogo de números sem repetição, usado para exercitar e demonstrar o motor.
//
// Começa em 1. Cada lance transforma o número atual n em n/3 (lance 1),
// 2n+1 (lance 2) ou 2n+5 (lance 3). Um lance fica bloqueado se ultrapassar o
// valor máximo ou se alguma resposta a partir do novo número cair num número
// já visitado (ou nele próprio). Quem não tem lances perde.

use crate::core::*;
use crate::error::GameError;
use crate::moves::{MoveGenerator, MoveList};
use crate::search::ordering::LazyOrdering;
use std::fmt;

pub const NUM_POSSIBLE_MOVES: u32 = 3;

const RAND_BIAS: u64 = 12963258741717719282;
const RAND_MULT: u64 = 11142652954828712569;

/// Número a que se chega jogando `mv` a partir de `number`
#[inline(always)]
pub fn apply_move(mv: Move, number: u32) -> u32 {
    match mv.id() {
        1 => number / 3,
        2 => 2 * number + 1,
        _ => 2 * number + 5,
    }
}

#[inline(always)]
fn visited_key(number: u32) -> u64 {
    RAND_BIAS.wrapping_add(RAND_MULT.wrapping_mul(number as u64))
}

/// O que um valor da raiz diz sobre o jogador seguido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalInterpretation {
    /// Quem joga na posição avaliada está em vantagem
    pub advantage: bool,
    /// Limite do maior número que o jogador seguido vai receber
    pub tracked_number_bound: u32,
}

/// O jogo, parametrizado pelo maior número permitido, por o jogador 1 ser ou
/// não o jogador seguido e por quantos bits baixos da avaliação se deitam
/// fora para ela caber num [`Value`].
///
/// O jogador seguido quer que o maior número que lhe calha seja o maior
/// possível; o adversário quer que seja pequeno.
#[derive(Clone)]
pub struct RepeatGameExt<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32> {
    visited: Vec<bool>,
    visited_hash: u64,
    curr_number: u32,
    max_tracked_number: u32,
    tracked_turn: bool,
    favor_wins_in_eval: bool,
    history: Vec<(u32, u32)>,
    won: bool,
}

/// Jogo completo, usado pelo binário
pub type RepeatGame = RepeatGameExt<10_000_000, true, 10>;

/// Instância pequena, com a árvore toda explorável em milissegundos
pub type SmallRepeatGame = RepeatGameExt<100, true, 0>;

impl<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32>
    RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>
{
    // Pior caso: vitória com bónus, tem de caber em Value
    const EVAL_FITS: () = assert!(
        EVAL_SHIFT < 16
            && MAX_VAL < u32::MAX / 4
            && ((2 * (MAX_VAL + 1) + ((1 << EVAL_SHIFT) - 1)) >> EVAL_SHIFT) + 1 < 32000,
        "evaluation range does not fit in Value"
    );

    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::EVAL_FITS;

        let mut game = RepeatGameExt {
            visited: vec![false; MAX_VAL as usize + 1],
            visited_hash: 0,
            curr_number: 1,
            max_tracked_number: 0,
            tracked_turn: TRACK_P1,
            favor_wins_in_eval: false,
            history: Vec::new(),
            won: false,
        };
        game.reset();
        game
    }

    fn reset(&mut self) {
        self.visited.iter_mut().for_each(|v| *v = false);
        self.visited[1] = true;
        self.visited_hash = visited_key(1);
        self.curr_number = 1;
        self.max_tracked_number = if TRACK_P1 { 1 } else { 0 };
        self.tracked_turn = TRACK_P1;
        self.history.clear();
        self.won = self.calculate_has_won();
    }

    #[inline]
    fn is_visited(&self, number: u32) -> bool {
        self.visited[number as usize]
    }

    /// Primeira resposta a partir de `next_value` que perde, se houver
    fn losing_reply(&self, next_value: u32) -> Option<u32> {
        (1..=NUM_POSSIBLE_MOVES)
            .map(|i| apply_move(Move(i), next_value))
            .find(|&reply| reply <= MAX_VAL && (self.is_visited(reply) || reply == next_value))
    }

    pub fn is_blocked(&self, next_value: u32) -> bool {
        next_value > MAX_VAL || self.losing_reply(next_value).is_some()
    }

    fn calculate_has_won(&self) -> bool {
        (1..=NUM_POSSIBLE_MOVES).all(|i| self.is_blocked(apply_move(Move(i), self.curr_number)))
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        (1..=NUM_POSSIBLE_MOVES).contains(&mv.id())
            && !self.is_blocked(apply_move(mv, self.curr_number))
    }

    /// Maior número atingível a partir de `number` num lance
    pub fn largest_next(number: u32) -> u32 {
        (1..=NUM_POSSIBLE_MOVES)
            .map(|i| apply_move(Move(i), number))
            .max()
            .unwrap_or(0)
    }

    /// Razão legível para `mv` não poder ser jogado aqui
    pub fn explain_illegal_move(&self, mv: Move) -> String {
        if !(1..=NUM_POSSIBLE_MOVES).contains(&mv.id()) {
            return format!("{} is not a move, pick 1 to {}", mv, NUM_POSSIBLE_MOVES);
        }
        let next_value = apply_move(mv, self.curr_number);
        if next_value > MAX_VAL {
            return format!("{} is out of bounds", next_value);
        }
        match self.losing_reply(next_value) {
            Some(reply) => format!("{} loses to response {}", next_value, reply),
            None => "Legal move".to_string(),
        }
    }

    /// Joga `mv` depois de o verificar, para lances vindos de fora do motor
    pub fn try_make_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.won {
            return Err(GameError::GameOver);
        }
        if !(1..=NUM_POSSIBLE_MOVES).contains(&mv.id()) {
            return Err(GameError::UnknownMove(mv));
        }
        if self.is_blocked(apply_move(mv, self.curr_number)) {
            return Err(GameError::IllegalMove {
                mv,
                reason: self.explain_illegal_move(mv),
            });
        }
        self.make_move(mv);
        Ok(())
    }

    pub fn set_favor_wins_in_eval(&mut self, value: bool) {
        self.favor_wins_in_eval = value;
    }

    pub fn curr_number(&self) -> u32 {
        self.curr_number
    }

    pub fn max_tracked_number(&self) -> u32 {
        self.max_tracked_number
    }

    pub fn is_tracked_turn(&self) -> bool {
        self.tracked_turn
    }

    pub fn tracked_player() -> Player {
        if TRACK_P1 {
            Player::First
        } else {
            Player::Second
        }
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    // Bónus de vitória arredondado ao múltiplo de 2^EVAL_SHIFT acima de MAX_VAL + 1
    #[inline]
    fn win_bonus() -> u32 {
        let bias = (1u32 << EVAL_SHIFT) - 1;
        ((MAX_VAL + 1 + bias) >> EVAL_SHIFT) << EVAL_SHIFT
    }

    /// Avaliação de `number` como máximo do jogador seguido, do ponto de
    /// vista de quem joga
    pub fn evaluate_number(&self, number: u32) -> Value {
        let mut eval = (MAX_VAL + 1).saturating_sub(number);
        if self.won && self.favor_wins_in_eval {
            eval += Self::win_bonus();
        }
        let magnitude = ((eval >> EVAL_SHIFT) + 1) as Value;
        if self.won || self.tracked_turn {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Traduz um valor da raiz no limite do número do jogador seguido. Só faz
    /// sentido para valores vindos de [`Game::evaluate`].
    pub fn interpret_eval(eval: Value) -> EvalInterpretation {
        let advantage = eval >= 0;
        let magnitude = (eval as i32).unsigned_abs().saturating_sub(1);
        let mut bound = magnitude << EVAL_SHIFT;
        let bonus = Self::win_bonus();
        if bound > bonus {
            bound -= bonus;
        }
        EvalInterpretation {
            advantage,
            tracked_number_bound: (MAX_VAL + 1).saturating_sub(bound),
        }
    }

    /// Lances que restam na posição, pela ordem do gerador
    pub fn legal_moves(&self) -> Vec<Move> {
        (1..=NUM_POSSIBLE_MOVES).map(Move).filter(|&mv| self.is_legal(mv)).collect()
    }
}

impl<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32> Default
    for RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>
{
    fn default() -> Self {
        Self::new()
    }
}

/// Gerador a pedido: tenta os lances 1, 2, 3 por ordem e salta os bloqueados
#[derive(Debug, Clone, Default)]
pub struct RepeatMoveGenerator {
    index: u32,
}

impl<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32>
    MoveGenerator<RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>> for RepeatMoveGenerator
{
    fn next_move(&mut self, game: &RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>) -> Move {
        while self.index < NUM_POSSIBLE_MOVES {
            self.index += 1;
            let mv = Move(self.index);
            if !game.is_blocked(apply_move(mv, game.curr_number)) {
                return mv;
            }
        }
        RepeatGameExt::<MAX_VAL, TRACK_P1, EVAL_SHIFT>::NO_MOVE
    }
}

impl<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32> Game
    for RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>
{
    const NO_MOVE: Move = Move(0);
    const COUNTER_MOVE_STATES: usize = MAX_VAL as usize + 1;

    type Ordering = LazyOrdering<RepeatMoveGenerator>;

    fn position_hash(&self) -> u64 {
        self.visited_hash
            ^ (self.curr_number as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (self.max_tracked_number as u64)
                .wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
                .rotate_left(31)
    }

    fn make_move(&mut self, mv: Move) {
        let next = apply_move(mv, self.curr_number);
        debug_assert!(next <= MAX_VAL, "move {mv} leaves the board from {}", self.curr_number);
        self.visited[next as usize] = true;
        self.visited_hash ^= visited_key(next);
        self.history.push((self.curr_number, self.max_tracked_number));
        if !self.tracked_turn && next > self.max_tracked_number {
            self.max_tracked_number = next;
        }
        self.tracked_turn = !self.tracked_turn;
        self.curr_number = next;
        self.won = self.calculate_has_won();
    }

    fn undo_move(&mut self) {
        let Some((previous, previous_max)) = self.history.pop() else {
            debug_assert!(false, "undo_move without a move to undo");
            return;
        };
        self.visited[self.curr_number as usize] = false;
        self.visited_hash ^= visited_key(self.curr_number);
        self.curr_number = previous;
        self.max_tracked_number = previous_max;
        self.tracked_turn = !self.tracked_turn;
        self.won = false;
    }

    fn is_game_over(&self) -> bool {
        self.won
    }

    fn evaluate(&self) -> Value {
        self.evaluate_number(self.max_tracked_number)
    }

    fn max_possible_evaluation(&self) -> Value {
        let mut eval = MAX_VAL + 1;
        if self.favor_wins_in_eval {
            eval += Self::win_bonus();
        }
        ((eval >> EVAL_SHIFT) + 1) as Value
    }

    fn current_player(&self) -> Player {
        if self.tracked_turn == TRACK_P1 {
            Player::First
        } else {
            Player::Second
        }
    }

    fn map_last_move_to_counter_move_state(&self) -> usize {
        self.curr_number as usize
    }

    fn clear(&mut self) {
        self.reset();
    }
}

impl<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32> LazyMoves
    for RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>
{
    type Generator = RepeatMoveGenerator;

    fn move_generator(&self) -> RepeatMoveGenerator {
        RepeatMoveGenerator::default()
    }
}

impl<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32> StaticMoves
    for RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>
{
    /// Heurística: menos respostas livres para o adversário é melhor
    fn moves(&self, out: &mut MoveList) {
        for id in 1..=NUM_POSSIBLE_MOVES {
            let mv = Move(id);
            let next = apply_move(mv, self.curr_number);
            if self.is_blocked(next) {
                continue;
            }
            let replies = (1..=NUM_POSSIBLE_MOVES)
                .filter(|&r| !self.is_blocked(apply_move(Move(r), next)))
                .count() as Score;
            out.add_move(mv, (NUM_POSSIBLE_MOVES as Score - replies) * 10);
        }
    }
}

impl<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32> fmt::Display
    for RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tracked = Self::tracked_player();
        writeln!(f, "[Game state]")?;
        write!(f, "Visited:")?;
        for (number, _) in self.visited.iter().enumerate().filter(|&(_, &v)| v) {
            write!(f, " {}", number)?;
        }
        writeln!(f)?;
        writeln!(f, "Current value: {}", self.curr_number)?;
        writeln!(f, "Max {} number: {}", tracked, self.max_tracked_number)?;
        write!(f, "Turn: {}", self.current_player())?;
        if self.won {
            write!(f, "\nGAME OVER")?;
        }
        Ok(())
    }
}

impl<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32> fmt::Debug
    for RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepeatGameExt")
            .field("curr_number", &self.curr_number)
            .field("max_tracked_number", &self.max_tracked_number)
            .field("tracked_turn", &self.tracked_turn)
            .field("plies", &self.history.len())
            .field("won", &self.won)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let game = SmallRepeatGame::new();
        assert_eq!(game.curr_number(), 1);
        assert_eq!(game.current_player(), Player::First);
        assert!(!game.is_game_over());
        // 1/3 = 0 repete-se a si próprio, 3 volta a 1
        assert_eq!(game.legal_moves(), vec![Move(3)]);
        assert_eq!(game.evaluate(), -101);
    }

    #[test]
    fn test_make_undo_restores_state() {
        let mut game = SmallRepeatGame::new();
        let hash = game.position_hash();
        game.make_move(Move(3));
        assert_eq!(game.curr_number(), 7);
        assert_eq!(game.current_player(), Player::Second);
        assert_ne!(game.position_hash(), hash);
        game.undo_move();
        assert_eq!(game.curr_number(), 1);
        assert_eq!(game.position_hash(), hash);
        assert_eq!(game.current_player(), Player::First);
    }

    #[test]
    fn test_tracked_maximum_updates_on_tracked_turn() {
        let mut game = SmallRepeatGame::new();
        game.make_move(Move(3)); // 7, P2 to move
        assert_eq!(game.max_tracked_number(), 1);
        let mv = game.legal_moves()[0];
        game.make_move(mv);
        assert_eq!(game.max_tracked_number(), game.curr_number().max(1));
    }

    #[test]
    fn test_generator_matches_legal_moves() {
        let mut game = SmallRepeatGame::new();
        game.make_move(Move(3));
        let mut generator = game.move_generator();
        let mut generated = Vec::new();
        loop {
            let mv = generator.next_move(&game);
            if mv == SmallRepeatGame::NO_MOVE {
                break;
            }
            generated.push(mv);
        }
        assert_eq!(generated, game.legal_moves());
        assert_eq!(legal_moves(&game), game.legal_moves());
    }

    #[test]
    fn test_try_make_move_explains_rejections() {
        let mut game = SmallRepeatGame::new();
        assert_eq!(game.try_make_move(Move(9)), Err(GameError::UnknownMove(Move(9))));
        match game.try_make_move(Move(2)) {
            Err(GameError::IllegalMove { reason, .. }) => assert_eq!(reason, "3 loses to response 1"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(game.explain_illegal_move(Move(3)), "Legal move");
        assert!(game.try_make_move(Move(3)).is_ok());
        assert_eq!(game.curr_number(), 7);
    }

    #[test]
    fn test_out_of_bounds_explanation() {
        let mut game = SmallRepeatGame::new();
        for _ in 0..4 {
            game.try_make_move(Move(3)).unwrap();
        }
        assert_eq!(game.curr_number(), 91);
        assert_eq!(game.explain_illegal_move(Move(2)), "183 is out of bounds");
        assert!(!game.is_legal(Move(2)));
    }

    #[test]
    fn test_interpret_eval() {
        let interpretation = SmallRepeatGame::interpret_eval(-51);
        assert!(!interpretation.advantage);
        assert_eq!(interpretation.tracked_number_bound, 51);

        // Com bónus de vitória o limite é o mesmo
        let with_bonus = SmallRepeatGame::interpret_eval(-152);
        assert_eq!(with_bonus.tracked_number_bound, 51);
        assert!(SmallRepeatGame::interpret_eval(3).advantage);
    }

    #[test]
    fn test_largest_next() {
        assert_eq!(SmallRepeatGame::largest_next(1), 7);
        assert_eq!(SmallRepeatGame::largest_next(10), 25);
    }

    #[test]
    fn test_game_ends_and_clear_resets() {
        let mut game = SmallRepeatGame::new();
        let mut plies = 0;
        while !game.is_game_over() {
            let mv = game.legal_moves()[0];
            game.make_move(mv);
            plies += 1;
        }
        assert!(plies > 0);
        assert!(game.legal_moves().is_empty());
        assert!(game.evaluate() < 0);
        assert!(game.to_string().ends_with("GAME OVER"));

        game.clear();
        assert_eq!(game.curr_number(), 1);
        assert!(!game.is_game_over());
        assert_eq!(game.position_hash(), SmallRepeatGame::new().position_hash());
    }

    #[test]
    fn test_full_size_parameters() {
        assert_eq!(RepeatGame::COUNTER_MOVE_STATES, 10_000_001);
        let interpretation = RepeatGame::interpret_eval(1);
        assert_eq!(interpretation.tracked_number_bound, 10_000_001);
    }

    fn largest_evaluation(game: &mut SmallRepeatGame) -> Value {
        let mut largest = game.evaluate().abs();
        for mv in game.legal_moves() {
            game.make_move(mv);
            largest = largest.max(largest_evaluation(game));
            game.undo_move();
        }
        largest
    }

    #[test]
    fn test_max_possible_evaluation_bounds_every_position() {
        for favor_wins in [false, true] {
            let mut game = SmallRepeatGame::new();
            game.set_favor_wins_in_eval(favor_wins);
            let ceiling = game.max_possible_evaluation();
            assert!(largest_evaluation(&mut game) <= ceiling, "favor wins {favor_wins}");
            assert!(ceiling < VALUE_INFINITE);
        }
    }
}

// Ficheiro: src/core/types.rs
// Descrição: Tipos fundamentais partilhados pelo motor e pelos jogos.

/// Avaliação de uma posição, do ponto de vista de quem joga
pub type Value = i16;

/// Heurística de ordenação de um lance. Mais larga do que `Value` para o
/// bónus de contra-lance nunca transbordar.
pub type Score = i32;

/// Profundidade restante em meios-lances
pub type Depth = u8;

/// Heurística usada quando o jogo junta um lance sem valor
pub const NEUTRAL_SCORE: Score = 0;

/// Limites da busca; nenhuma avaliação do jogo os pode atingir
pub const VALUE_INFINITE: Value = i16::MAX;
pub const VALUE_NONE: Value = i16::MIN;

// Enum para representar o jogador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl std::ops::Not for Player {
    type Output = Player;

    fn not(self) -> Self::Output {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::First => write!(f, "P1"),
            Player::Second => write!(f, "P2"),
        }
    }
}

/// Identificador de uma ação legal. Cada jogo reserva um valor como
/// sentinela de "sem lance" (`Game::NO_MOVE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Move(pub u32);

impl Move {
    #[inline(always)]
    pub const fn new(id: u32) -> Self {
        Move(id)
    }

    #[inline(always)]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Move {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Move)
    }
}

/// Lance com a sua heurística de ordenação. Dentro de uma lista só `value`
/// pode ser alterado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtMove {
    pub mv: Move,
    pub value: Score,
}

impl ExtMove {
    pub fn new(mv: Move, value: Score) -> Self {
        ExtMove { mv, value }
    }
}

impl From<Move> for ExtMove {
    fn from(mv: Move) -> Self {
        ExtMove::new(mv, NEUTRAL_SCORE)
    }
}

impl PartialEq<Move> for ExtMove {
    fn eq(&self, other: &Move) -> bool {
        self.mv == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_toggle() {
        assert_eq!(!Player::First, Player::Second);
        assert_eq!(!!Player::Second, Player::Second);
    }

    #[test]
    fn test_ext_move_defaults_to_neutral_score() {
        let ext: ExtMove = Move(7).into();
        assert_eq!(ext.value, NEUTRAL_SCORE);
        assert!(ext == Move(7));
    }

    #[test]
    fn test_move_parse() {
        assert_eq!(" 3 ".parse::<Move>().unwrap(), Move(3));
        assert!("x".parse::<Move>().is_err());
    }
}

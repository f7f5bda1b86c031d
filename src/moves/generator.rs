use crate::core::types::Move;

/// Produtor de uso único, só para a frente, dos lances legais de uma posição.
///
/// A posição chega em cada chamada porque a busca altera o jogo entre
/// chamadas; tem de ser a mesma posição em que o gerador foi criado.
/// Devolve o `NO_MOVE` do jogo quando se esgota.
pub trait MoveGenerator<G: ?Sized> {
    fn next_move(&mut self, game: &G) -> Move;
}

//! A self-contained chess rule engine and search: legal move generation with
//! full rule fidelity (castling, en passant, promotion, the draw rules), and
//! a depth-limited, time-bounded alpha-beta search over a Zobrist-keyed
//! transposition table.
//!
//! The library surface is four operations: [`load_fen`], [`to_fen`],
//! [`legal_moves`], [`apply_move`], and [`search`]. There is no bundled CLI
//! or transport binding; integrators wrap this API as they see fit.

pub mod attacks;
pub mod castle_rights;
pub mod color;
pub mod error;
pub mod evaluate;
pub mod game;
pub mod movegen;
pub mod piece;
pub mod position;
pub mod search;
pub mod square;
pub mod transposition;
pub mod zobrist;

use std::time::Duration;

pub use color::Color;
pub use error::{FenError, MoveError};
pub use game::{Game, GameState};
pub use movegen::{Move, MoveList};
pub use piece::{Cell, Piece, PieceKind};
pub use position::Position;
pub use search::{SearchResult, Searcher};
pub use square::Square;

/// Parses a FEN string into a fresh [`Game`] with empty repetition history.
pub fn load_fen(fen: &str) -> Result<Game, FenError> {
    Game::load_fen(fen)
}

/// Serializes a game's current position back to FEN.
pub fn to_fen(game: &Game) -> String {
    game.to_fen()
}

/// All legal moves for the side to move; order is unspecified.
pub fn legal_moves(game: &Game) -> MoveList {
    game.legal_moves()
}

/// Applies `mv`, which must be legal, and reports the resulting terminal
/// status alongside the new game.
pub fn apply_move(game: &Game, mv: Move) -> Result<(Game, GameState), MoveError> {
    game.apply_move(mv)
}

/// Runs an iterative-deepening alpha-beta search from `game`'s position, up
/// to `max_depth` plies or `max_time`, whichever comes first.
pub fn search(game: &Game, max_depth: u8, max_time: Duration) -> SearchResult {
    let mut searcher = Searcher::new();
    searcher.find_best_move(game.position(), max_depth, max_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_api_round_trip() {
        let game = load_fen(position::STARTING_POSITION_FEN).unwrap();
        assert_eq!(to_fen(&game), position::STARTING_POSITION_FEN);
        assert_eq!(legal_moves(&game).len(), 20);
    }

    #[test]
    fn test_external_api_apply_and_search() {
        let game = load_fen(position::STARTING_POSITION_FEN).unwrap();
        let mv = legal_moves(&game)[0];
        let (next, state) = apply_move(&game, mv).unwrap();
        assert_eq!(state, GameState::Playing);
        let result = search(&next, 1, Duration::from_secs(1));
        assert!(result.best.is_some());
    }
}

use core::fmt;

use rustc_hash::FxHashMap;

use crate::attacks;
use crate::color::Color;
use crate::error::{FenError, MoveError};
use crate::movegen::{self, Move, MoveList};
use crate::position::Position;
use crate::zobrist;

/// Classification of a position given its repetition history.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameState {
    Playing,
    Checkmate,
    Stalemate,
    Draw50Moves,
    DrawRepetition,
    DrawInsufficientMaterial,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            GameState::Playing => "playing",
            GameState::Checkmate => "checkmate",
            GameState::Stalemate => "stalemate",
            GameState::Draw50Moves => "draw (50-move rule)",
            GameState::DrawRepetition => "draw (threefold repetition)",
            GameState::DrawInsufficientMaterial => "draw (insufficient material)",
        };
        write!(f, "{}", s)
    }
}

/// The running game: a Position plus the repetition history maintained
/// alongside it. History is cleared on FEN load and appended on every
/// executed move.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    repetitions: FxHashMap<u64, u32>,
}

impl Game {
    pub fn new() -> Self {
        Game::from_position(Position::starting_position())
    }

    pub fn from_position(position: Position) -> Self {
        let mut repetitions = FxHashMap::default();
        repetitions.insert(zobrist::hash(&position), 1);
        Game { position, repetitions }
    }

    pub fn load_fen(fen: &str) -> Result<Game, FenError> {
        Position::from_fen(fen).map(Game::from_position)
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn legal_moves(&self) -> MoveList {
        movegen::legal_moves(&self.position)
    }

    pub fn apply_move(&self, mv: Move) -> Result<(Game, GameState), MoveError> {
        let next_position = movegen::make_move(&self.position, mv)?;
        let mut next = Game {
            position: next_position,
            repetitions: self.repetitions.clone(),
        };
        let hash = zobrist::hash(&next.position);
        *next.repetitions.entry(hash).or_insert(0) += 1;
        let state = next.state();
        Ok((next, state))
    }

    /// Classifies the current position. Checkmate is checked first and wins
    /// outright over every draw rule; the remaining evaluation order is
    /// 50-move rule, then repetition, then insufficient material, then
    /// stalemate, else playing.
    pub fn state(&self) -> GameState {
        let no_legal_moves = movegen::legal_moves(&self.position).is_empty();
        if no_legal_moves && attacks::is_in_check(&self.position, self.position.side_to_move()) {
            return GameState::Checkmate;
        }
        if self.position.halfmove_clock() >= 100 {
            return GameState::Draw50Moves;
        }
        let hash = zobrist::hash(&self.position);
        if self.repetitions.get(&hash).copied().unwrap_or(0) >= 3 {
            return GameState::DrawRepetition;
        }
        if has_insufficient_material(&self.position) {
            return GameState::DrawInsufficientMaterial;
        }
        if no_legal_moves {
            return GameState::Stalemate;
        }
        GameState::Playing
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

fn has_insufficient_material(position: &Position) -> bool {
    use crate::piece::PieceKind::*;

    let mut white_minors: Vec<crate::square::Square> = Vec::new();
    let mut black_minors: Vec<crate::square::Square> = Vec::new();
    let mut white_knights = 0u32;
    let mut black_knights = 0u32;
    let mut white_bishops = 0u32;
    let mut black_bishops = 0u32;

    for square in position.squares() {
        if let crate::piece::Cell::Occupied(p) = position.get(square) {
            match p.kind {
                Pawn | Rook | Queen => return false,
                Knight => {
                    match p.color {
                        Color::White => {
                            white_knights += 1;
                            white_minors.push(square);
                        }
                        Color::Black => {
                            black_knights += 1;
                            black_minors.push(square);
                        }
                    }
                }
                Bishop => match p.color {
                    Color::White => {
                        white_bishops += 1;
                        white_minors.push(square);
                    }
                    Color::Black => {
                        black_bishops += 1;
                        black_minors.push(square);
                    }
                },
                King => {}
            }
        }
    }

    let white_count = white_minors.len();
    let black_count = black_minors.len();

    if white_count == 0 && black_count == 0 {
        return true;
    }
    if white_count == 1 && black_count == 0 || white_count == 0 && black_count == 1 {
        return true;
    }
    if white_knights == 2 && white_bishops == 0 && black_count == 0 {
        return true;
    }
    if black_knights == 2 && black_bishops == 0 && white_count == 0 {
        return true;
    }
    if white_bishops == 1 && white_knights == 0 && black_bishops == 1 && black_knights == 0 {
        let w = white_minors[0];
        let b = black_minors[0];
        let w_is_light = (w.row + w.col) % 2 == 0;
        let b_is_light = (b.row + b.col) % 2 == 0;
        return w_is_light == b_is_light;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(alg: &str) -> crate::square::Square {
        crate::square::Square::from_algebraic(alg).unwrap()
    }

    fn apply(game: &Game, from: &str, to: &str) -> (Game, GameState) {
        game.apply_move(Move::new(square(from), square(to), None)).unwrap()
    }

    #[test]
    fn test_scholars_mate() {
        let game = Game::new();
        let (game, _) = apply(&game, "e2", "e4");
        let (game, _) = apply(&game, "e7", "e5");
        let (game, _) = apply(&game, "f1", "c4");
        let (game, _) = apply(&game, "b8", "c6");
        let (game, _) = apply(&game, "d1", "h5");
        let (game, _) = apply(&game, "g8", "f6");
        let (_, state) = apply(&game, "h5", "f7");
        assert_eq!(state, GameState::Checkmate);
    }

    #[test]
    fn test_underpromotion_mate() {
        let game = Game::load_fen("8/5PK1/8/8/8/8/6k1/8 w - - 0 1").unwrap();
        let mv = Move::new(square("f7"), square("f8"), Some(crate::piece::PieceKind::Knight));
        let (_, state) = game.apply_move(mv).unwrap();
        assert_eq!(state, GameState::Checkmate);
    }

    #[test]
    fn test_threefold_repetition() {
        let mut game = Game::new();
        let mut state = GameState::Playing;
        for _ in 0..2 {
            let (g, _) = apply(&game, "g1", "f3");
            let (g, _) = apply(&g, "g8", "f6");
            let (g, _) = apply(&g, "f3", "g1");
            let (g, s) = apply(&g, "f6", "g8");
            game = g;
            state = s;
        }
        assert_eq!(state, GameState::DrawRepetition);
    }

    #[test]
    fn test_insufficient_material_king_vs_king() {
        let game = Game::load_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game.state(), GameState::DrawInsufficientMaterial);
    }

    #[test]
    fn test_sufficient_material_with_rook() {
        let game = Game::load_fen("8/8/8/4k3/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_fifty_move_rule() {
        let game = Game::load_fen("8/8/8/4k3/8/4N3/8/4K3 b - - 99 50").unwrap();
        let mv = game.legal_moves()[0];
        let (_, state) = game.apply_move(mv).unwrap();
        assert_eq!(state, GameState::Draw50Moves);
    }

    #[test]
    fn test_checkmate_takes_precedence_over_fifty_move_rule() {
        let game = Game::load_fen("6k1/8/6K1/8/8/8/R7/8 w - - 99 50").unwrap();
        let mv = Move::new(square("a2"), square("a8"), None);
        let (_, state) = game.apply_move(mv).unwrap();
        assert_eq!(state, GameState::Checkmate);
    }
}

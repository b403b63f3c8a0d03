use core::fmt;

use regex::Regex;

use crate::castle_rights::{self, NO_CASTLE_RIGHTS};
use crate::color::Color;
use crate::error::FenError;
use crate::piece::{Cell, Piece, PieceKind};
use crate::square::Square;

pub const STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The aggregate chess position: the board, side to move, castling rights,
/// en passant target, and the two move clocks. Mutated only by
/// [`crate::movegen::make_move`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    board: [[Cell; 8]; 8],
    side_to_move: Color,
    castling_rights: u8,
    en_passant_target: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    pub fn empty() -> Self {
        Position {
            board: [[Cell::Empty; 8]; 8],
            side_to_move: Color::White,
            castling_rights: NO_CASTLE_RIGHTS,
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn starting_position() -> Self {
        Position::from_fen(STARTING_POSITION_FEN).expect("starting position FEN is well-formed")
    }

    pub fn get(&self, square: Square) -> Cell {
        self.board[square.row as usize][square.col as usize]
    }

    pub fn put(&mut self, square: Square, piece: Piece) {
        self.board[square.row as usize][square.col as usize] = Cell::Occupied(piece);
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let cell = self.board[square.row as usize][square.col as usize];
        self.board[square.row as usize][square.col as usize] = Cell::Empty;
        cell.piece()
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub fn castling_rights(&self) -> u8 {
        self.castling_rights
    }

    pub fn set_castling_rights(&mut self, rights: u8) {
        self.castling_rights = rights;
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn set_en_passant_target(&mut self, target: Option<Square>) {
        self.en_passant_target = target;
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn set_halfmove_clock(&mut self, clock: u32) {
        self.halfmove_clock = clock;
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn set_fullmove_number(&mut self, n: u32) {
        self.fullmove_number = n;
    }

    /// Locates the unique king of `color`. Panics if the invariant that
    /// exactly one king of each color exists has been violated.
    pub fn king_square(&self, color: Color) -> Square {
        for row in 0..8 {
            for col in 0..8 {
                let sq = Square::new(row, col);
                if let Cell::Occupied(p) = self.get(sq) {
                    if p.kind == PieceKind::King && p.color == color {
                        return sq;
                    }
                }
            }
        }
        panic!("invariant violated: no {:?} king on the board", color);
    }

    pub fn squares(&self) -> impl Iterator<Item = Square> {
        (0..8).flat_map(|row| (0..8).map(move |col| Square::new(row, col)))
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares().filter_map(move |sq| match self.get(sq) {
            Cell::Occupied(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }
}

fn fen_regex() -> Regex {
    Regex::new(
        r"(?x)
        ^\s*
        (?P<placement>\S+)\s+
        (?P<turn>[wb])\s+
        (?P<castling>-|[KQkq]{1,4})\s+
        (?P<ep>-|[a-h][36])\s+
        (?P<halfmove>\d+)\s+
        (?P<fullmove>\d+)\s*$
        ",
    )
    .expect("static FEN regex is valid")
}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let re = fen_regex();
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount(fields.len()));
        }
        let caps = re
            .captures(fen.trim())
            .ok_or_else(|| FenError::WrongFieldCount(fields.len()))?;

        let placement = &caps["placement"];
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount(ranks.len()));
        }

        let mut position = Position::empty();
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut col = 0i8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as i8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if col >= 8 {
                        return Err(FenError::WrongFileCount(rank_str.to_string()));
                    }
                    position.put(Square::new(row as i8, col), piece);
                    col += 1;
                } else {
                    return Err(FenError::UnknownPiece(c));
                }
            }
            if col != 8 {
                return Err(FenError::WrongFileCount(rank_str.to_string()));
            }
        }

        position.side_to_move = match &caps["turn"] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSideToMove(other.to_string())),
        };

        position.castling_rights = castle_rights::from_fen(&caps["castling"])
            .ok_or_else(|| FenError::InvalidCastlingRights(caps["castling"].to_string()))?;

        position.en_passant_target = match &caps["ep"] {
            "-" => None,
            s => Some(
                Square::from_algebraic(s)
                    .ok_or_else(|| FenError::InvalidEnPassantTarget(s.to_string()))?,
            ),
        };

        position.halfmove_clock = caps["halfmove"]
            .parse()
            .map_err(|_| FenError::InvalidHalfmoveClock(caps["halfmove"].to_string()))?;
        position.fullmove_number = caps["fullmove"]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidFullmoveNumber(caps["fullmove"].to_string()))?;
        if position.fullmove_number == 0 {
            return Err(FenError::InvalidFullmoveNumber("0".to_string()));
        }

        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for row in 0..8 {
            let mut rank = String::new();
            let mut empty_run = 0;
            for col in 0..8 {
                match self.get(Square::new(row, col)) {
                    Cell::Empty => empty_run += 1,
                    Cell::Occupied(p) => {
                        if empty_run > 0 {
                            rank.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        rank.push(p.to_fen_char());
                    }
                }
            }
            if empty_run > 0 {
                rank.push_str(&empty_run.to_string());
            }
            ranks.push(rank);
        }
        let placement = ranks.join("/");

        let ep = match self.en_passant_target {
            Some(sq) => sq.to_algebraic(),
            None => "-".to_string(),
        };

        format!(
            "{} {} {} {} {} {}",
            placement,
            self.side_to_move,
            castle_rights::to_fen(self.castling_rights),
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8 {
                let c = match self.get(Square::new(row, col)) {
                    Cell::Empty => '.',
                    Cell::Occupied(p) => p.to_fen_char(),
                };
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_round_trip() {
        let pos = Position::starting_position();
        assert_eq!(pos.to_fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn test_parse_fen_fields() {
        let fen = "r3k2r/pppq1ppp/2np1n2/2b1p3/2B1P3/2NP1N2/PPPQ1PPP/R3K2R w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.castling_rights(), castle_rights::ALL_CASTLE_RIGHTS);
        assert_eq!(pos.en_passant_target(), None);
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
        assert_eq!(
            pos.get(Square::from_algebraic("e1").unwrap()).piece(),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn test_en_passant_field() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(
            pos.en_passant_target(),
            Some(Square::from_algebraic("d6").unwrap())
        );
    }

    #[test]
    fn test_rejects_wrong_rank_count() {
        assert!(Position::from_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn test_rejects_unknown_piece() {
        let err = Position::from_fen("xxxxxxxx/8/8/8/8/8/8/8 w - - 0 1").unwrap_err();
        assert_eq!(err, FenError::UnknownPiece('x'));
    }

    #[test]
    fn test_rejects_bad_field_count() {
        assert!(Position::from_fen("8/8/8/8/8/8/8/8 w KQkq - 0").is_err());
    }
}

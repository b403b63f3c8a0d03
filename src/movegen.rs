use core::fmt;

use smallvec::SmallVec;

use crate::attacks::{self, pawn_forward};
use crate::castle_rights::{self, ALL_CASTLE_RIGHTS};
use crate::color::Color;
use crate::error::MoveError;
use crate::piece::{Cell, Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;

/// A single move: the origin and destination squares, plus an explicit
/// promotion kind for pawn moves reaching the last rank. Callers must set
/// `promotion` to `Some(kind)` for such a move and to `None` otherwise; a
/// promotion move left as `None` is rejected as illegal rather than silently
/// defaulted to a queen.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        Move { from, to, promotion }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            let c = match kind {
                PieceKind::Queen => 'q',
                PieceKind::Rook => 'r',
                PieceKind::Bishop => 'b',
                PieceKind::Knight => 'n',
                _ => unreachable!("only Q/R/B/N are valid promotion kinds"),
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

pub type MoveList = SmallVec<[Move; 64]>;

const PROMOTION_KINDS: [PieceKind; 4] =
    [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

/// Generates every legal move for the side to move: pseudo-legal generation
/// per piece kind, then a king-safety filter.
pub fn legal_moves(position: &Position) -> MoveList {
    let color = position.side_to_move();
    let mut moves = MoveList::new();
    generate_pseudo_legal(position, color, &mut moves);
    moves.retain(|mv| leaves_king_safe(position, *mv, color));
    moves
}

fn leaves_king_safe(position: &Position, mv: Move, color: Color) -> bool {
    match make_move_unchecked(position, mv) {
        Ok(next) => !attacks::is_in_check(&next, color),
        Err(_) => false,
    }
}

fn generate_pseudo_legal(position: &Position, color: Color, moves: &mut MoveList) {
    for (from, piece) in position.pieces(color) {
        match piece.kind {
            PieceKind::Pawn => generate_pawn_moves(position, from, color, moves),
            PieceKind::Knight => generate_offset_moves(position, from, color, moves, &KNIGHT_OFFSETS),
            PieceKind::Bishop => generate_sliding_moves(position, from, color, moves, &BISHOP_DIRECTIONS),
            PieceKind::Rook => generate_sliding_moves(position, from, color, moves, &ROOK_DIRECTIONS),
            PieceKind::Queen => {
                generate_sliding_moves(position, from, color, moves, &BISHOP_DIRECTIONS);
                generate_sliding_moves(position, from, color, moves, &ROOK_DIRECTIONS);
            }
            PieceKind::King => {
                generate_offset_moves(position, from, color, moves, &KING_OFFSETS);
                generate_castle_moves(position, from, color, moves);
            }
        }
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

fn generate_offset_moves(
    position: &Position,
    from: Square,
    color: Color,
    moves: &mut MoveList,
    offsets: &[(i8, i8)],
) {
    for (dr, dc) in offsets.iter() {
        let to = from.offset(*dr, *dc);
        if !to.is_on_board() {
            continue;
        }
        if !position.get(to).is_color(color) {
            moves.push(Move::new(from, to, None));
        }
    }
}

fn generate_sliding_moves(
    position: &Position,
    from: Square,
    color: Color,
    moves: &mut MoveList,
    directions: &[(i8, i8)],
) {
    for (dr, dc) in directions.iter() {
        let mut to = from.offset(*dr, *dc);
        while to.is_on_board() {
            match position.get(to) {
                Cell::Empty => {
                    moves.push(Move::new(from, to, None));
                }
                Cell::Occupied(p) if p.color != color => {
                    moves.push(Move::new(from, to, None));
                    break;
                }
                Cell::Occupied(_) => break,
            }
            to = to.offset(*dr, *dc);
        }
    }
}

fn generate_pawn_moves(position: &Position, from: Square, color: Color, moves: &mut MoveList) {
    let forward = pawn_forward(color);
    let start_row = match color {
        Color::White => 6,
        Color::Black => 1,
    };
    let promotion_row = match color {
        Color::White => 0,
        Color::Black => 7,
    };

    let one_step = from.offset(forward, 0);
    let one_step_clear = one_step.is_on_board() && position.get(one_step).is_empty();
    if one_step_clear {
        push_pawn_move(from, one_step, promotion_row, moves);

        let two_step = from.offset(forward * 2, 0);
        if from.row == start_row && position.get(two_step).is_empty() {
            moves.push(Move::new(from, two_step, None));
        }
    }

    for dc in [-1i8, 1] {
        let to = from.offset(forward, dc);
        if !to.is_on_board() {
            continue;
        }
        if position.get(to).is_color(color.opposite()) {
            push_pawn_move(from, to, promotion_row, moves);
        } else if Some(to) == position.en_passant_target() {
            let captured_sq = Square::new(from.row, to.col);
            if position.get(captured_sq).is_color(color.opposite()) {
                moves.push(Move::new(from, to, None));
            }
        }
    }
}

fn push_pawn_move(from: Square, to: Square, promotion_row: i8, moves: &mut MoveList) {
    if to.row == promotion_row {
        for kind in PROMOTION_KINDS.iter() {
            moves.push(Move::new(from, to, Some(*kind)));
        }
    } else {
        moves.push(Move::new(from, to, None));
    }
}

fn generate_castle_moves(position: &Position, from: Square, color: Color, moves: &mut MoveList) {
    let home_row = match color {
        Color::White => 7,
        Color::Black => 0,
    };
    if from.row != home_row || from.col != 4 {
        return;
    }
    let opponent = color.opposite();

    if position.castling_rights() & castle_rights::kingside(color) != 0 {
        let rook_sq = Square::new(home_row, 7);
        let f = Square::new(home_row, 5);
        let g = Square::new(home_row, 6);
        if matches!(position.get(rook_sq).piece(), Some(p) if p.kind == PieceKind::Rook && p.color == color)
            && position.get(f).is_empty()
            && position.get(g).is_empty()
            && !attacks::is_square_attacked(position, from, opponent)
            && !attacks::is_square_attacked(position, f, opponent)
            && !attacks::is_square_attacked(position, g, opponent)
        {
            moves.push(Move::new(from, g, None));
        }
    }

    if position.castling_rights() & castle_rights::queenside(color) != 0 {
        let rook_sq = Square::new(home_row, 0);
        let b = Square::new(home_row, 1);
        let c = Square::new(home_row, 2);
        let d = Square::new(home_row, 3);
        if matches!(position.get(rook_sq).piece(), Some(p) if p.kind == PieceKind::Rook && p.color == color)
            && position.get(b).is_empty()
            && position.get(c).is_empty()
            && position.get(d).is_empty()
            && !attacks::is_square_attacked(position, from, opponent)
            && !attacks::is_square_attacked(position, d, opponent)
            && !attacks::is_square_attacked(position, c, opponent)
        {
            moves.push(Move::new(from, c, None));
        }
    }
}

/// Applies `mv` to `position`, requiring that it appear in `legal_moves`.
pub fn make_move(position: &Position, mv: Move) -> Result<Position, MoveError> {
    if !legal_moves(position).contains(&mv) {
        return Err(MoveError::IllegalMove(mv.to_string()));
    }
    make_move_unchecked(position, mv)
}

/// Applies `mv` without checking legality; used internally both to filter
/// candidates (simulate-and-check-for-check) and by `make_move` once a
/// candidate has already been confirmed legal.
fn make_move_unchecked(position: &Position, mv: Move) -> Result<Position, MoveError> {
    let color = position.side_to_move();
    let mover = position
        .get(mv.from)
        .piece()
        .ok_or_else(|| MoveError::IllegalMove(mv.to_string()))?;
    if mover.color != color {
        return Err(MoveError::IllegalMove(mv.to_string()));
    }

    let is_pawn = mover.kind == PieceKind::Pawn;
    let is_castle = mover.kind == PieceKind::King && (mv.to.col - mv.from.col).abs() == 2;
    let is_en_passant =
        is_pawn && mv.from.col != mv.to.col && position.get(mv.to).is_empty();

    if is_pawn && mv.to.row == match color {
        Color::White => 0,
        Color::Black => 7,
    } && mv.promotion.is_none()
    {
        return Err(MoveError::IllegalMove(mv.to_string()));
    }

    let mut next = position.clone();

    let is_capture = next.get(mv.to).piece().is_some() || is_en_passant;

    if is_en_passant {
        let captured_sq = Square::new(mv.from.row, mv.to.col);
        next.remove(captured_sq);
    }

    let mut rights = next.castling_rights();
    if mover.kind == PieceKind::King {
        rights &= !castle_rights::both(color);
    }
    if mover.kind == PieceKind::Rook {
        let home_row = match color {
            Color::White => 7,
            Color::Black => 0,
        };
        if mv.from.row == home_row && mv.from.col == 0 {
            rights &= !castle_rights::queenside(color);
        } else if mv.from.row == home_row && mv.from.col == 7 {
            rights &= !castle_rights::kingside(color);
        }
    }
    if let Some(captured) = next.get(mv.to).piece() {
        let opponent_home_row = match color.opposite() {
            Color::White => 7,
            Color::Black => 0,
        };
        if captured.kind == PieceKind::Rook && mv.to.row == opponent_home_row {
            if mv.to.col == 0 {
                rights &= !castle_rights::queenside(color.opposite());
            } else if mv.to.col == 7 {
                rights &= !castle_rights::kingside(color.opposite());
            }
        }
    }
    next.set_castling_rights(rights & ALL_CASTLE_RIGHTS);

    next.remove(mv.from);
    next.put(mv.to, mover);

    if is_castle {
        let home_row = mv.from.row;
        if mv.to.col == 6 {
            let rook = next.remove(Square::new(home_row, 7)).expect("rook on home corner");
            next.put(Square::new(home_row, 5), rook);
        } else if mv.to.col == 2 {
            let rook = next.remove(Square::new(home_row, 0)).expect("rook on home corner");
            next.put(Square::new(home_row, 3), rook);
        }
    }

    if is_pawn {
        if let Some(promotion_kind) = mv.promotion {
            next.put(mv.to, Piece::new(promotion_kind, color));
        }
    }

    let is_double_push = is_pawn && (mv.to.row - mv.from.row).abs() == 2;
    if is_double_push {
        let passed = Square::new((mv.from.row + mv.to.row) / 2, mv.from.col);
        next.set_en_passant_target(Some(passed));
    } else {
        next.set_en_passant_target(None);
    }

    if is_pawn || is_capture {
        next.set_halfmove_clock(0);
    } else {
        next.set_halfmove_clock(next.halfmove_clock() + 1);
    }

    next.set_side_to_move(color.opposite());
    if color == Color::Black {
        next.set_fullmove_number(next.fullmove_number() + 1);
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(from: &str, to: &str) -> Move {
        Move::new(
            Square::from_algebraic(from).unwrap(),
            Square::from_algebraic(to).unwrap(),
            None,
        )
    }

    #[test]
    fn test_starting_position_has_twenty_moves() {
        let pos = Position::starting_position();
        assert_eq!(legal_moves(&pos).len(), 20);
    }

    #[test]
    fn test_en_passant_capture() {
        let pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        let m = mv("e5", "d6");
        assert!(legal_moves(&pos).contains(&m));
        let next = make_move(&pos, m).unwrap();
        assert_eq!(next.get(Square::from_algebraic("d5").unwrap()), Cell::Empty);
        assert!(matches!(
            next.get(Square::from_algebraic("d6").unwrap()),
            Cell::Occupied(p) if p.kind == PieceKind::Pawn && p.color == Color::White
        ));
        assert_eq!(next.en_passant_target(), None);
    }

    #[test]
    fn test_white_kingside_castle() {
        let pos = Position::from_fen(
            "r3k2r/pppq1ppp/2np1n2/2b1p3/2B1P3/2NP1N2/PPPQ1PPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let m = mv("e1", "g1");
        assert!(legal_moves(&pos).contains(&m));
        let next = make_move(&pos, m).unwrap();
        assert!(matches!(
            next.get(Square::from_algebraic("g1").unwrap()).piece(),
            Some(p) if p.kind == PieceKind::King && p.color == Color::White
        ));
        assert!(matches!(
            next.get(Square::from_algebraic("f1").unwrap()).piece(),
            Some(p) if p.kind == PieceKind::Rook && p.color == Color::White
        ));
        assert_eq!(castle_rights::to_fen(next.castling_rights()), "kq");
        assert_eq!(next.side_to_move(), Color::Black);
    }

    #[test]
    fn test_promotion_requires_explicit_kind() {
        let pos = Position::from_fen("8/5PK1/8/8/8/8/6k1/8 w - - 0 1").unwrap();
        let bad = Move::new(
            Square::from_algebraic("f7").unwrap(),
            Square::from_algebraic("f8").unwrap(),
            None,
        );
        assert!(make_move(&pos, bad).is_err());
        let good = Move::new(
            Square::from_algebraic("f7").unwrap(),
            Square::from_algebraic("f8").unwrap(),
            Some(PieceKind::Knight),
        );
        assert!(make_move(&pos, good).is_ok());
    }

    #[test]
    fn test_castling_rights_never_increase() {
        let pos = Position::starting_position();
        let m = mv("e2", "e4");
        let next = make_move(&pos, m).unwrap();
        assert_eq!(next.castling_rights(), pos.castling_rights());
    }

    #[test]
    fn test_mover_never_left_in_check() {
        let pos = Position::starting_position();
        for m in legal_moves(&pos) {
            let next = make_move(&pos, m).unwrap();
            assert!(!attacks::is_in_check(&next, pos.side_to_move()));
        }
    }
}

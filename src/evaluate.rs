use crate::color::Color;
use crate::piece::{Cell, PieceKind};
use crate::position::Position;

const CENTER_SQUARES: [(i8, i8); 4] = [(4, 3), (4, 4), (3, 3), (3, 4)]; // d4, d5, e4, e5
const CENTER_CONTROL_BONUS: i32 = 10;
const PAWN_STRUCTURE_PENALTY: i32 = 5;
const KING_SAFETY_BONUS: i32 = 20;

/// Static score in centipawns from White's perspective, negated for Black to
/// return a score from the side-to-move's perspective.
pub fn evaluate(position: &Position) -> i32 {
    let score = material_score(position)
        + center_control_score(position)
        + pawn_structure_score(position)
        + king_safety_score(position);

    match position.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}

fn material_score(position: &Position) -> i32 {
    let mut score = 0;
    for square in position.squares() {
        if let Cell::Occupied(p) = position.get(square) {
            let value = p.kind.material_value();
            score += match p.color {
                Color::White => value,
                Color::Black => -value,
            };
        }
    }
    score
}

fn center_control_score(position: &Position) -> i32 {
    let mut score = 0;
    for (row, col) in CENTER_SQUARES.iter() {
        if let Cell::Occupied(p) = position.get(crate::square::Square::new(*row, *col)) {
            score += match p.color {
                Color::White => CENTER_CONTROL_BONUS,
                Color::Black => -CENTER_CONTROL_BONUS,
            };
        }
    }
    score
}

fn pawn_structure_score(position: &Position) -> i32 {
    let mut white_files = [0i32; 8];
    let mut black_files = [0i32; 8];
    for square in position.squares() {
        if let Cell::Occupied(p) = position.get(square) {
            if p.kind == PieceKind::Pawn {
                match p.color {
                    Color::White => white_files[square.col as usize] += 1,
                    Color::Black => black_files[square.col as usize] += 1,
                }
            }
        }
    }
    let mut score = 0;
    for count in white_files.iter() {
        if *count > 1 {
            score -= PAWN_STRUCTURE_PENALTY * (*count - 1);
        }
    }
    for count in black_files.iter() {
        if *count > 1 {
            score += PAWN_STRUCTURE_PENALTY * (*count - 1);
        }
    }
    score
}

fn king_safety_score(position: &Position) -> i32 {
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let king = position.king_square(color);
        let dist = chebyshev_distance_from_center(king);
        let bonus = KING_SAFETY_BONUS * (7 - dist);
        score += match color {
            Color::White => bonus,
            Color::Black => -bonus,
        };
    }
    score
}

fn chebyshev_distance_from_center(square: crate::square::Square) -> i32 {
    let row_dist = ((square.row as i32) - 4).abs().min(((square.row as i32) - 3).abs());
    let col_dist = ((square.col as i32) - 4).abs().min(((square.col as i32) - 3).abs());
    row_dist.max(col_dist)
}

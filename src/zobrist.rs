use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::castle_rights::ALL_CASTLE_RIGHTS;
use crate::color::Color;
use crate::piece::{Cell, PieceKind};
use crate::position::Position;

/// Process-wide Zobrist constants. Randomised once, lazily, at first use;
/// immutable for the remainder of the process so that transposition table
/// entries stay comparable across every search run.
struct ZobristKeys {
    pieces: [[[u64; 8]; 8]; 12],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

fn piece_index(kind: PieceKind, color: Color) -> usize {
    let base = match kind {
        PieceKind::Pawn => 0,
        PieceKind::Knight => 1,
        PieceKind::Bishop => 2,
        PieceKind::Rook => 3,
        PieceKind::Queen => 4,
        PieceKind::King => 5,
    };
    match color {
        Color::White => base,
        Color::Black => base + 6,
    }
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::from_entropy();
        let mut pieces = [[[0u64; 8]; 8]; 12];
        for piece in pieces.iter_mut() {
            for row in piece.iter_mut() {
                for key in row.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }
        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = rng.next_u64();
        }
        let mut en_passant_file = [0u64; 8];
        for key in en_passant_file.iter_mut() {
            *key = rng.next_u64();
        }
        ZobristKeys {
            pieces,
            side_to_move: rng.next_u64(),
            castling,
            en_passant_file,
        }
    }
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(ZobristKeys::new)
}

/// Computes the Zobrist hash of `position` from scratch. Recomputation
/// (rather than incremental updates during search) satisfies this engine's
/// correctness requirements.
pub fn hash(position: &Position) -> u64 {
    let keys = keys();
    let mut h = 0u64;

    for square in position.squares() {
        if let Cell::Occupied(p) = position.get(square) {
            h ^= keys.pieces[piece_index(p.kind, p.color)][square.row as usize][square.col as usize];
        }
    }

    if position.side_to_move() == Color::Black {
        h ^= keys.side_to_move;
    }

    h ^= keys.castling[(position.castling_rights() & (ALL_CASTLE_RIGHTS)) as usize];

    if let Some(ep) = position.en_passant_target() {
        h ^= keys.en_passant_file[ep.col as usize];
    }

    h
}

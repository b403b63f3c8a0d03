use crate::color::Color;

pub const WHITE_KINGSIDE: u8 = 0b0001;
pub const WHITE_QUEENSIDE: u8 = 0b0010;
pub const BLACK_KINGSIDE: u8 = 0b0100;
pub const BLACK_QUEENSIDE: u8 = 0b1000;
pub const ALL_CASTLE_RIGHTS: u8 = WHITE_KINGSIDE | WHITE_QUEENSIDE | BLACK_KINGSIDE | BLACK_QUEENSIDE;
pub const NO_CASTLE_RIGHTS: u8 = 0;

pub fn kingside(color: Color) -> u8 {
    match color {
        Color::White => WHITE_KINGSIDE,
        Color::Black => BLACK_KINGSIDE,
    }
}

pub fn queenside(color: Color) -> u8 {
    match color {
        Color::White => WHITE_QUEENSIDE,
        Color::Black => BLACK_QUEENSIDE,
    }
}

pub fn both(color: Color) -> u8 {
    kingside(color) | queenside(color)
}

/// Renders the canonical `KQkq`/`-` castling field of a FEN string.
pub fn to_fen(rights: u8) -> String {
    if rights == NO_CASTLE_RIGHTS {
        return "-".to_string();
    }
    let mut s = String::with_capacity(4);
    if rights & WHITE_KINGSIDE != 0 {
        s.push('K');
    }
    if rights & WHITE_QUEENSIDE != 0 {
        s.push('Q');
    }
    if rights & BLACK_KINGSIDE != 0 {
        s.push('k');
    }
    if rights & BLACK_QUEENSIDE != 0 {
        s.push('q');
    }
    s
}

pub fn from_fen(field: &str) -> Option<u8> {
    if field == "-" {
        return Some(NO_CASTLE_RIGHTS);
    }
    let mut rights = NO_CASTLE_RIGHTS;
    for c in field.chars() {
        let bit = match c {
            'K' => WHITE_KINGSIDE,
            'Q' => WHITE_QUEENSIDE,
            'k' => BLACK_KINGSIDE,
            'q' => BLACK_QUEENSIDE,
            _ => return None,
        };
        if rights & bit != 0 {
            return None;
        }
        rights |= bit;
    }
    Some(rights)
}

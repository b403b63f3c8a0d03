use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum FenError {
    #[error("expected 6 space-separated fields, found {0}")]
    WrongFieldCount(usize),
    #[error("piece placement must have 8 ranks, found {0}")]
    WrongRankCount(usize),
    #[error("rank `{0}` does not sum to 8 files")]
    WrongFileCount(String),
    #[error("unrecognized piece character `{0}`")]
    UnknownPiece(char),
    #[error("side to move must be `w` or `b`, found `{0}`")]
    InvalidSideToMove(String),
    #[error("invalid castling rights field `{0}`")]
    InvalidCastlingRights(String),
    #[error("invalid en passant target `{0}`")]
    InvalidEnPassantTarget(String),
    #[error("invalid halfmove clock `{0}`")]
    InvalidHalfmoveClock(String),
    #[error("invalid fullmove number `{0}`")]
    InvalidFullmoveNumber(String),
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum MoveError {
    #[error("{0} is not a legal move in this position")]
    IllegalMove(String),
}

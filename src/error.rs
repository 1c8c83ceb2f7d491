// src/error.rs
// Typed input faults. Contract violations (applying an illegal move,
// undoing past the root) are debug-assertions, not values of these types —
// see the error-handling design notes in SPEC_FULL.md.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 space-separated fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("piece placement has {found} ranks, expected 8")]
    WrongRankCount { found: usize },

    #[error("rank {rank} sums to {found} files, expected 8")]
    WrongFileCount { rank: usize, found: u32 },

    #[error("invalid piece character '{0}'")]
    InvalidPieceChar(char),

    #[error("found {found} {color:?} king(s), expected exactly 1")]
    WrongKingCount { color: crate::square::Color, found: u32 },

    #[error("found {found} total pieces, more than the 32 the board allows")]
    TooManyPieces { found: u32 },

    #[error("side-to-move field must be 'w' or 'b', found '{0}'")]
    InvalidSideToMove(String),

    #[error("castling field must be '-' (Shatranj has no castling), found '{0}'")]
    CastlingFieldNotDash(String),

    #[error("en-passant field must be '-' (Shatranj has no en passant), found '{0}'")]
    EnPassantFieldNotDash(String),

    #[error("invalid halfmove clock '{0}'")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number '{0}'")]
    InvalidFullmoveNumber(String),

    #[error("the side not to move is in check")]
    OpponentInCheck,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UciMoveError {
    #[error("UCI move strings are 4 or 5 characters, found {found}")]
    WrongLength { found: usize },

    #[error("invalid square in UCI move")]
    BadSquare,

    #[error("trailing promotion character must be 'q', found '{0}'")]
    BadPromotionChar(char),
}

//! Recoverable error types. Broken internal invariants panic instead.

use thiserror::Error;

use crate::types::Square;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN is missing the {0} field")]
    MissingField(&'static str),
    #[error("FEN has unexpected trailing field '{0}'")]
    TrailingField(String),
    #[error("FEN board has {0} ranks, expected 8")]
    WrongRankCount(usize),
    #[error("invalid piece character '{0}' in FEN board")]
    InvalidPiece(char),
    #[error("FEN rank {rank} describes {files} files, expected 8")]
    WrongFileCount { rank: u8, files: u32 },
    #[error("invalid side to move '{0}'")]
    InvalidSideToMove(String),
    #[error("invalid castling character '{0}'")]
    InvalidCastling(char),
    #[error("invalid en-passant square '{0}'")]
    InvalidEnPassant(String),
    #[error("invalid half-move clock '{0}'")]
    InvalidHalfmoveClock(String),
    #[error("invalid full-move number '{0}'")]
    InvalidFullmoveNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("malformed move text '{0}'")]
    Malformed(String),
    #[error("'{0}' is not a pseudo-legal move in this position")]
    NotAvailable(String),
}

/// A broken structural invariant found by [`crate::Position::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("square {0} is claimed by more than one piece kind")]
    OverlappingPieces(Square),
    #[error("square {0} is claimed by both colors")]
    OverlappingColors(Square),
    #[error("color and piece boards disagree about square {0}")]
    OccupancyMismatch(Square),
    #[error("cached hash {cached:#018x} differs from recomputed {computed:#018x}")]
    HashMismatch { cached: u64, computed: u64 },
}

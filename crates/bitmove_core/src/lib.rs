//! Bitboard chess core: board representation, pseudo-legal move generation,
//! reversible move application and perft.
//!
//! ```
//! use bitmove_core::{perft, Position};
//!
//! let mut pos = Position::startpos();
//! assert_eq!(perft(&mut pos, 2), 400);
//! ```

pub mod attacks;
pub mod bitboard;
pub mod castling;
pub mod chess_move;
pub mod error;
pub mod movegen;
pub mod perft;
pub mod position;
pub mod types;
pub mod zobrist;

pub use attacks::*;
pub use bitboard::Bitboard;
pub use castling::*;
pub use chess_move::{Move, MoveKind};
pub use error::*;
pub use movegen::{generate_pseudo_moves, pseudo_moves_into};
pub use perft::*;
pub use position::{Position, START_FEN, Undo};
pub use types::*;
pub use zobrist::ZOBRIST;

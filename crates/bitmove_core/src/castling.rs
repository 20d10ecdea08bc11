//! Castling rights and the fixed squares each castle involves.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::types::{Color, Square};

/// Four independent flags: white king-side, white queen-side, black king-side,
/// black queen-side. A set flag only means the king and that rook have not
/// moved or been captured; occupancy and attacks are checked during generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: CastlingRights = CastlingRights(0b0001);
    pub const WHITE_QUEENSIDE: CastlingRights = CastlingRights(0b0010);
    pub const BLACK_KINGSIDE: CastlingRights = CastlingRights(0b0100);
    pub const BLACK_QUEENSIDE: CastlingRights = CastlingRights(0b1000);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline(always)]
    pub const fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn with(self, other: CastlingRights) -> CastlingRights {
        CastlingRights(self.0 | other.0)
    }

    #[must_use]
    pub const fn without(self, other: CastlingRights) -> CastlingRights {
        CastlingRights(self.0 & !other.0)
    }

    /// Rights lost when a piece leaves or lands on `sq`: the king's home
    /// square drops both of that color's flags, a rook corner drops one.
    pub const fn lost_by_touching(sq: Square) -> CastlingRights {
        match sq.index() {
            0 => Self::WHITE_QUEENSIDE,
            4 => CastlingRights(Self::WHITE_KINGSIDE.0 | Self::WHITE_QUEENSIDE.0),
            7 => Self::WHITE_KINGSIDE,
            56 => Self::BLACK_QUEENSIDE,
            60 => CastlingRights(Self::BLACK_KINGSIDE.0 | Self::BLACK_QUEENSIDE.0),
            63 => Self::BLACK_KINGSIDE,
            _ => Self::NONE,
        }
    }

    /// Index (0..4) of each single flag that is set, lowest flag first.
    pub fn flag_indices(self) -> impl Iterator<Item = usize> {
        (0..4).filter(move |i| self.0 & (1 << i) != 0)
    }
}

/// FEN castling field: `KQkq` subset, or `-` when empty.
impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (flag, ch) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.contains(flag) {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Geometry of one castle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastleSide {
    pub right: CastlingRights,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares strictly between king and rook; all must be empty.
    pub between: Bitboard,
    /// Squares the king stands on, crosses, or lands on; none may be attacked.
    pub king_path: Bitboard,
}

const fn mask(squares: &[Square]) -> Bitboard {
    let mut bits = 0u64;
    let mut i = 0;
    while i < squares.len() {
        bits |= 1u64 << squares[i].index();
        i += 1;
    }
    Bitboard(bits)
}

/// `CASTLES[color]` holds the king-side castle first, then the queen-side one.
pub static CASTLES: [[CastleSide; 2]; 2] = [
    [
        CastleSide {
            right: CastlingRights::WHITE_KINGSIDE,
            king_from: Square::E1,
            king_to: Square::G1,
            rook_from: Square::H1,
            rook_to: Square::F1,
            between: mask(&[Square::F1, Square::G1]),
            king_path: mask(&[Square::E1, Square::F1, Square::G1]),
        },
        CastleSide {
            right: CastlingRights::WHITE_QUEENSIDE,
            king_from: Square::E1,
            king_to: Square::C1,
            rook_from: Square::A1,
            rook_to: Square::D1,
            between: mask(&[Square::B1, Square::C1, Square::D1]),
            king_path: mask(&[Square::E1, Square::D1, Square::C1]),
        },
    ],
    [
        CastleSide {
            right: CastlingRights::BLACK_KINGSIDE,
            king_from: Square::E8,
            king_to: Square::G8,
            rook_from: Square::H8,
            rook_to: Square::F8,
            between: mask(&[Square::F8, Square::G8]),
            king_path: mask(&[Square::E8, Square::F8, Square::G8]),
        },
        CastleSide {
            right: CastlingRights::BLACK_QUEENSIDE,
            king_from: Square::E8,
            king_to: Square::C8,
            rook_from: Square::A8,
            rook_to: Square::D8,
            between: mask(&[Square::B8, Square::C8, Square::D8]),
            king_path: mask(&[Square::E8, Square::D8, Square::C8]),
        },
    ],
];

#[inline(always)]
pub fn castles_for(color: Color) -> &'static [CastleSide; 2] {
    &CASTLES[color.idx()]
}

/// The castle a king of `color` performs by landing on `king_to`.
pub fn castle_by_destination(color: Color, king_to: Square) -> Option<&'static CastleSide> {
    castles_for(color).iter().find(|c| c.king_to == king_to)
}

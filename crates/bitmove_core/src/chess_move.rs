//! Compact 16-bit move encoding.
//!
//! Layout (LSB -> MSB):
//! - bits  0..=5  : origin square
//! - bits  6..=11 : destination square
//! - bits 12..=15 : [`MoveKind`] tag
//!
//! Within the tag, bit 2 marks a promotion and bit 3 marks a capture (en
//! passant included), so either question is a single mask test.

use std::fmt;

use crate::types::{PieceKind, Square};

const FROM_MASK: u16 = 0x003F;
const TO_SHIFT: u16 = 6;
const TO_MASK: u16 = 0x0FC0;
const KIND_SHIFT: u16 = 12;

const PROMOTION_FLAG: u8 = 0b0100;
const CAPTURE_FLAG: u8 = 0b1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Quiet = 0b0000,
    DoublePush = 0b0001,
    Castle = 0b0010,
    KnightPromotion = 0b0100,
    BishopPromotion = 0b0101,
    RookPromotion = 0b0110,
    QueenPromotion = 0b0111,
    Capture = 0b1000,
    EnPassant = 0b1001,
    KnightPromotionCapture = 0b1100,
    BishopPromotionCapture = 0b1101,
    RookPromotionCapture = 0b1110,
    QueenPromotionCapture = 0b1111,
}

impl MoveKind {
    /// Decode a 4-bit tag. Patterns 3, 10 and 11 are unassigned.
    pub const fn from_bits(bits: u8) -> Option<MoveKind> {
        Some(match bits {
            0b0000 => MoveKind::Quiet,
            0b0001 => MoveKind::DoublePush,
            0b0010 => MoveKind::Castle,
            0b0100 => MoveKind::KnightPromotion,
            0b0101 => MoveKind::BishopPromotion,
            0b0110 => MoveKind::RookPromotion,
            0b0111 => MoveKind::QueenPromotion,
            0b1000 => MoveKind::Capture,
            0b1001 => MoveKind::EnPassant,
            0b1100 => MoveKind::KnightPromotionCapture,
            0b1101 => MoveKind::BishopPromotionCapture,
            0b1110 => MoveKind::RookPromotionCapture,
            0b1111 => MoveKind::QueenPromotionCapture,
            _ => return None,
        })
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    #[inline(always)]
    pub const fn is_capture(self) -> bool {
        self.bits() & CAPTURE_FLAG != 0
    }

    #[inline(always)]
    pub const fn is_promotion(self) -> bool {
        self.bits() & PROMOTION_FLAG != 0
    }

    /// Piece a promotion produces. The low two bits select it.
    pub const fn promotion(self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }
        Some(match self.bits() & 0b0011 {
            0 => PieceKind::Knight,
            1 => PieceKind::Bishop,
            2 => PieceKind::Rook,
            _ => PieceKind::Queen,
        })
    }

    /// Promotion tag for `piece`, capturing or not. `None` for pawn and king.
    pub const fn promoting_to(piece: PieceKind, capture: bool) -> Option<MoveKind> {
        let low = match piece {
            PieceKind::Knight => 0,
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            PieceKind::Queen => 3,
            PieceKind::Pawn | PieceKind::King => return None,
        };
        let flags = if capture {
            PROMOTION_FLAG | CAPTURE_FLAG
        } else {
            PROMOTION_FLAG
        };
        MoveKind::from_bits(flags | low)
    }
}

/// A move: origin, destination and kind packed into 16 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Packs the three fields. No legality checks.
    #[inline(always)]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Move {
        Move(
            from.index() as u16
                | ((to.index() as u16) << TO_SHIFT)
                | ((kind.bits() as u16) << KIND_SHIFT),
        )
    }

    /// Reinterpret a value previously produced by [`Move::raw`].
    #[inline(always)]
    pub const fn from_raw(raw: u16) -> Move {
        Move(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub const fn source(self) -> Square {
        Square::from_index_unchecked((self.0 & FROM_MASK) as u8)
    }

    #[inline(always)]
    pub const fn dest(self) -> Square {
        Square::from_index_unchecked(((self.0 & TO_MASK) >> TO_SHIFT) as u8)
    }

    #[inline(always)]
    const fn tag(self) -> u8 {
        (self.0 >> KIND_SHIFT) as u8
    }

    /// # Panics
    /// If the tag is one of the unassigned patterns. Only a corrupted raw
    /// value can carry one.
    #[inline]
    pub fn kind(self) -> MoveKind {
        match MoveKind::from_bits(self.tag()) {
            Some(kind) => kind,
            None => panic!("corrupt move tag {:#06b} in {:#06x}", self.tag(), self.0),
        }
    }

    #[inline(always)]
    pub const fn is_capture(self) -> bool {
        self.tag() & CAPTURE_FLAG != 0
    }

    #[inline(always)]
    pub const fn is_promotion(self) -> bool {
        self.tag() & PROMOTION_FLAG != 0
    }

    pub fn promotion(self) -> Option<PieceKind> {
        self.kind().promotion()
    }
}

/// Long algebraic text: `e2e4`, `e7e8q`. The promotion letter is always lowercase.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source(), self.dest())?;
        if let Some(piece) = self.promotion() {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self} {:?})", self.kind())
    }
}

#[cfg(test)]
#[path = "chess_move_tests.rs"]
mod chess_move_tests;

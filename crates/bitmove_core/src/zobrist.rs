//! Zobrist keys for the incremental position hash.
//!
//! All keys come from one flat splitmix64 stream, laid out as:
//! - piece on a square, `(color * 6 + kind) * 64 + square`
//! - black to move
//! - one per castling flag, in [`CastlingRights`] bit order
//! - one per en-passant target file

use crate::castling::CastlingRights;
use crate::types::{Color, PieceKind, Square};

const PIECE_KEYS: usize = 0;
const SIDE_KEY: usize = PIECE_KEYS + 2 * 6 * 64;
const CASTLING_KEYS: usize = SIDE_KEY + 1;
const EP_KEYS: usize = CASTLING_KEYS + 4;
const KEY_COUNT: usize = EP_KEYS + 8;

const SEED: u64 = 0x5EED_B17B_0A2D_C0DE;

pub struct ZobristKeys {
    keys: [u64; KEY_COUNT],
}

impl ZobristKeys {
    const fn from_seed(seed: u64) -> Self {
        let mut keys = [0u64; KEY_COUNT];
        let mut state = seed;
        let mut i = 0;
        while i < KEY_COUNT {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            keys[i] = z ^ (z >> 31);
            i += 1;
        }
        ZobristKeys { keys }
    }

    #[inline(always)]
    pub fn piece_key(&self, color: Color, kind: PieceKind, sq: Square) -> u64 {
        self.keys[PIECE_KEYS + (color.idx() * 6 + kind.idx()) * 64 + sq.index() as usize]
    }

    #[inline(always)]
    pub fn side_key(&self) -> u64 {
        self.keys[SIDE_KEY]
    }

    /// XOR of the keys of every flag in `rights`.
    #[inline]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        rights
            .flag_indices()
            .fold(0, |key, i| key ^ self.keys[CASTLING_KEYS + i])
    }

    #[inline(always)]
    pub fn ep_key(&self, target: Square) -> u64 {
        self.keys[EP_KEYS + target.file() as usize]
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::from_seed(SEED);

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;

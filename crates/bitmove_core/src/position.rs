//! Position: piece placement plus the state needed to generate and apply moves.
//!
//! Placement is stored as six piece-kind boards and two color boards. The board
//! for one colored piece kind is the intersection of the two; every mutation
//! goes through [`Position::toggle_piece`], which keeps both views and the
//! Zobrist hash in step.

use std::fmt;

use tracing::debug;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::castling::{CastlingRights, castle_by_destination};
use crate::chess_move::{Move, MoveKind};
use crate::error::{FenError, MoveParseError, PositionError};
use crate::movegen::generate_pseudo_moves;
use crate::types::{Color, Piece, PieceKind, Square};
use crate::zobrist::ZOBRIST;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    kinds: [Bitboard; 6],
    colors: [Bitboard; 2],
    side_to_move: Color,
    castling: CastlingRights,
    /// Square a capturing pawn would land on, set only right after a double push.
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
}

/// State [`Position::make_move`] cannot recover from the move itself.
#[derive(Clone, Copy, Debug)]
pub struct Undo {
    moved: PieceKind,
    captured: Option<PieceKind>,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
}

impl Position {
    /// A board with no pieces, White to move, no rights.
    pub fn empty() -> Self {
        Position {
            kinds: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    pub fn startpos() -> Self {
        let mut p = Position::empty();
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, &kind) in back.iter().enumerate() {
            let file = file as i8;
            for (color, rank, pawn_rank) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                if let (Some(piece_sq), Some(pawn_sq)) =
                    (Square::new(file, rank), Square::new(file, pawn_rank))
                {
                    p.toggle_piece(color, kind, piece_sq);
                    p.toggle_piece(color, PieceKind::Pawn, pawn_sq);
                }
            }
        }
        p.castling = CastlingRights::ALL;
        p.hash = p.compute_hash();
        p
    }

    /// Parse Forsyth-Edwards Notation. The half-move and full-move fields may be
    /// omitted and default to 0 and 1.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let board = fields.next().ok_or(FenError::MissingField("piece placement"))?;
        let stm = fields.next().ok_or(FenError::MissingField("side to move"))?;
        let castle = fields.next().ok_or(FenError::MissingField("castling"))?;
        let ep = fields.next().ok_or(FenError::MissingField("en passant"))?;
        let halfmove = fields.next().unwrap_or("0");
        let fullmove = fields.next().unwrap_or("1");
        if let Some(extra) = fields.next() {
            return Err(FenError::TrailingField(extra.to_string()));
        }

        let mut pos = Position::empty();

        let ranks: Vec<&str> = board.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount(ranks.len()));
        }
        for (idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - idx as u8; // FEN lists rank 8 .. 1
            let mut file = 0u32;
            for ch in rank_str.chars() {
                if let Some(run) = ch.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(FenError::InvalidPiece(ch));
                    }
                    file += run;
                    continue;
                }
                let piece = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                let sq = Square::new(file.min(8) as i8, rank as i8).ok_or(
                    FenError::WrongFileCount {
                        rank: rank + 1,
                        files: file + 1,
                    },
                )?;
                pos.toggle_piece(piece.color, piece.kind, sq);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::WrongFileCount {
                    rank: rank + 1,
                    files: file,
                });
            }
        }

        pos.side_to_move = match stm {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::InvalidSideToMove(stm.to_string())),
        };

        if castle != "-" {
            for c in castle.chars() {
                let flag = match c {
                    'K' => CastlingRights::WHITE_KINGSIDE,
                    'Q' => CastlingRights::WHITE_QUEENSIDE,
                    'k' => CastlingRights::BLACK_KINGSIDE,
                    'q' => CastlingRights::BLACK_QUEENSIDE,
                    _ => return Err(FenError::InvalidCastling(c)),
                };
                pos.castling = pos.castling.with(flag);
            }
        }

        if ep != "-" {
            let target: Square = ep
                .parse()
                .map_err(|_| FenError::InvalidEnPassant(ep.to_string()))?;
            // The target sits behind the pawn that just moved.
            let expected_rank = match pos.side_to_move {
                Color::White => 5,
                Color::Black => 2,
            };
            if target.rank() != expected_rank {
                return Err(FenError::InvalidEnPassant(ep.to_string()));
            }
            pos.en_passant = Some(target);
        }

        pos.halfmove_clock = halfmove
            .parse()
            .map_err(|_| FenError::InvalidHalfmoveClock(halfmove.to_string()))?;
        pos.fullmove_number = fullmove
            .parse()
            .map_err(|_| FenError::InvalidFullmoveNumber(fullmove.to_string()))?;

        pos.hash = pos.compute_hash();
        debug!(fen, hash = pos.hash, "parsed position");
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8i8).rev() {
            let mut empty = 0;
            for file in 0..8i8 {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        let stm = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{fen} {stm} {} {ep} {} {}",
            self.castling, self.halfmove_clock, self.fullmove_number
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline(always)]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Pieces of one color and kind.
    #[inline(always)]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.kinds[kind.idx()] & self.colors[color.idx()]
    }

    /// Pieces of one kind, both colors.
    #[inline(always)]
    pub fn kind_board(&self, kind: PieceKind) -> Bitboard {
        self.kinds[kind.idx()]
    }

    #[inline(always)]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.colors[color.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    pub fn kind_at(&self, sq: Square) -> Option<PieceKind> {
        if !self.occupied().get_bit(sq) {
            return None;
        }
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.kinds[kind.idx()].get_bit(sq))
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let kind = self.kind_at(sq)?;
        let color = if self.colors[Color::White.idx()].get_bit(sq) {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, kind })
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces(color, PieceKind::King);
        (!kings.is_empty()).then(|| kings.lsb())
    }

    /// Whether any piece of color `by` attacks `sq`, given current occupancy.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let occupied = self.occupied();
        let queens = self.pieces(by, PieceKind::Queen);

        !(pawn_attacks(sq, by.other()) & self.pieces(by, PieceKind::Pawn)).is_empty()
            || !(knight_attacks(sq) & self.pieces(by, PieceKind::Knight)).is_empty()
            || !(king_attacks(sq) & self.pieces(by, PieceKind::King)).is_empty()
            || !(bishop_attacks(sq, occupied) & (self.pieces(by, PieceKind::Bishop) | queens))
                .is_empty()
            || !(rook_attacks(sq, occupied) & (self.pieces(by, PieceKind::Rook) | queens))
                .is_empty()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Hash recomputed from scratch; equals [`Position::hash`] for any position
    /// reached through the public API.
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0u64;
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                for sq in self.pieces(color, kind) {
                    hash ^= ZOBRIST.piece_key(color, kind, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.side_key();
        }
        hash ^= ZOBRIST.castling_key(self.castling);
        if let Some(ep) = self.en_passant {
            hash ^= ZOBRIST.ep_key(ep);
        }
        hash
    }

    /// Verify the placement views agree with each other and with the hash.
    pub fn check_invariants(&self) -> Result<(), PositionError> {
        let mut seen = Bitboard::EMPTY;
        for board in self.kinds {
            let overlap = seen & board;
            if !overlap.is_empty() {
                return Err(PositionError::OverlappingPieces(overlap.lsb()));
            }
            seen |= board;
        }
        let both = self.colors[0] & self.colors[1];
        if !both.is_empty() {
            return Err(PositionError::OverlappingColors(both.lsb()));
        }
        let mismatch = seen ^ self.occupied();
        if !mismatch.is_empty() {
            return Err(PositionError::OccupancyMismatch(mismatch.lsb()));
        }
        let computed = self.compute_hash();
        if computed != self.hash {
            return Err(PositionError::HashMismatch {
                cached: self.hash,
                computed,
            });
        }
        Ok(())
    }

    /// Find the pseudo-legal move of the side to move written as `text`
    /// (`e2e4`, `e7e8q`). The promotion letter is case-insensitive.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let malformed = || MoveParseError::Malformed(text.to_string());
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(malformed());
        }
        let from: Square = text[0..2].parse().map_err(|_| malformed())?;
        let to: Square = text[2..4].parse().map_err(|_| malformed())?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_char(c) {
                Some(kind @ (PieceKind::Knight
                | PieceKind::Bishop
                | PieceKind::Rook
                | PieceKind::Queen)) => Some(kind),
                _ => return Err(malformed()),
            },
        };

        generate_pseudo_moves(self, self.side_to_move)
            .into_iter()
            .find(|mv| mv.source() == from && mv.dest() == to && mv.promotion() == promotion)
            .ok_or_else(|| MoveParseError::NotAvailable(text.to_string()))
    }

    // =========================================================================
    // Applying moves
    // =========================================================================

    /// Flip one colored piece on or off `sq`, updating both board views and the hash.
    #[inline(always)]
    fn toggle_piece(&mut self, color: Color, kind: PieceKind, sq: Square) {
        let bit = Bitboard::from_square(sq);
        self.kinds[kind.idx()] ^= bit;
        self.colors[color.idx()] ^= bit;
        self.hash ^= ZOBRIST.piece_key(color, kind, sq);
    }

    /// Play `mv` in place. `mv` must have been generated for this position.
    ///
    /// # Panics
    /// If the origin square is empty or the move's kind contradicts the board
    /// (a capture onto an empty square, a castle to a non-castling square).
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let us = self.side_to_move;
        let them = us.other();
        let from = mv.source();
        let to = mv.dest();
        let kind = mv.kind();

        let moved = self.kind_at(from).expect("make_move: no piece on origin square");
        debug_assert!(
            self.colors[us.idx()].get_bit(from),
            "make_move: origin piece belongs to the side not on move"
        );

        let mut undo = Undo {
            moved,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        };

        if kind == MoveKind::EnPassant {
            let victim = to
                .jump(0, -us.forward())
                .expect("make_move: en-passant target on an edge rank");
            self.toggle_piece(them, PieceKind::Pawn, victim);
            undo.captured = Some(PieceKind::Pawn);
        } else if mv.is_capture() {
            let victim = self
                .kind_at(to)
                .expect("make_move: capture onto an empty square");
            self.toggle_piece(them, victim, to);
            undo.captured = Some(victim);
        }

        self.toggle_piece(us, moved, from);
        self.toggle_piece(us, kind.promotion().unwrap_or(moved), to);

        if kind == MoveKind::Castle {
            let castle = castle_by_destination(us, to)
                .expect("make_move: castle to a non-castling square");
            self.toggle_piece(us, PieceKind::Rook, castle.rook_from);
            self.toggle_piece(us, PieceKind::Rook, castle.rook_to);
        }

        if let Some(old) = self.en_passant.take() {
            self.hash ^= ZOBRIST.ep_key(old);
        }
        if kind == MoveKind::DoublePush
            && let Some(target) = from.jump(0, us.forward())
        {
            self.en_passant = Some(target);
            self.hash ^= ZOBRIST.ep_key(target);
        }

        let rights = self
            .castling
            .without(CastlingRights::lost_by_touching(from))
            .without(CastlingRights::lost_by_touching(to));
        self.hash ^= ZOBRIST.castling_key(self.castling) ^ ZOBRIST.castling_key(rights);
        self.castling = rights;

        if moved == PieceKind::Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = them;
        self.hash ^= ZOBRIST.side_key();

        undo
    }

    /// Reverse [`Position::make_move`]. `mv` and `undo` must be the pair it used.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        let them = self.side_to_move;
        let us = them.other();
        let from = mv.source();
        let to = mv.dest();
        let kind = mv.kind();

        if kind == MoveKind::Castle
            && let Some(castle) = castle_by_destination(us, to)
        {
            self.toggle_piece(us, PieceKind::Rook, castle.rook_to);
            self.toggle_piece(us, PieceKind::Rook, castle.rook_from);
        }

        self.toggle_piece(us, kind.promotion().unwrap_or(undo.moved), to);
        self.toggle_piece(us, undo.moved, from);

        match (kind, undo.captured) {
            (MoveKind::EnPassant, _) => {
                if let Some(victim) = to.jump(0, -us.forward()) {
                    self.toggle_piece(them, PieceKind::Pawn, victim);
                }
            }
            (_, Some(victim)) => self.toggle_piece(them, victim, to),
            _ => {}
        }

        self.side_to_move = us;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.hash;
    }

    /// Copy-make: the position after `mv`, leaving `self` untouched.
    #[must_use]
    pub fn apply(&self, mv: Move) -> Position {
        let mut next = *self;
        next.make_move(mv);
        next
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Piece letters, rank 8 on top, with file letters underneath.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8i8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8i8 {
                let c = Square::new(file, rank)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', Piece::to_char);
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;

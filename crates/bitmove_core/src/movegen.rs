//! Pseudo-legal move generation.
//!
//! Moves obey piece geometry and occupancy but may leave the mover's own king
//! attacked; filtering those out is left to the caller (see
//! [`Position::is_square_attacked`]). Castling is the exception: a king may not
//! castle out of, through, or into an attacked square.
//!
//! Output order is deterministic: piece kinds in [`PieceKind::ALL`] order,
//! origins in ascending square order, then each piece's own destination order.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::castling::castles_for;
use crate::chess_move::{Move, MoveKind};
use crate::position::Position;
use crate::types::{Color, PieceKind, Square};

/// All pseudo-legal moves for `side`, freshly allocated.
pub fn generate_pseudo_moves(pos: &Position, side: Color) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    pseudo_moves_into(pos, side, &mut out);
    out
}

/// Same as [`generate_pseudo_moves`], reusing `out` (cleared first).
pub fn pseudo_moves_into(pos: &Position, side: Color, out: &mut Vec<Move>) {
    out.clear();
    let rules = Generator {
        pos,
        side,
        own: pos.occupancy(side),
        enemy: pos.occupancy(side.other()),
        occupied: pos.occupied(),
    };

    for kind in PieceKind::ALL {
        let mut pieces = pos.pieces(side, kind);
        while !pieces.is_empty() {
            let from = pieces.lsb();
            match kind {
                PieceKind::Pawn => rules.pawn(from, out),
                PieceKind::Knight => rules.targets(from, knight_attacks(from), out),
                PieceKind::Bishop => rules.targets(from, bishop_attacks(from, rules.occupied), out),
                PieceKind::Rook => rules.targets(from, rook_attacks(from, rules.occupied), out),
                PieceKind::Queen => rules.targets(from, queen_attacks(from, rules.occupied), out),
                PieceKind::King => {
                    rules.targets(from, king_attacks(from), out);
                    rules.castles(from, out);
                }
            }
            pieces = pieces.pop_bit(from);
        }
    }
}

/// Per-call snapshot of the boards every piece rule consults.
struct Generator<'a> {
    pos: &'a Position,
    side: Color,
    own: Bitboard,
    enemy: Bitboard,
    occupied: Bitboard,
}

impl Generator<'_> {
    /// Knight, king and slider destinations: quiet onto empty squares, capture
    /// onto enemy ones, nothing onto friendly ones.
    fn targets(&self, from: Square, attacks: Bitboard, out: &mut Vec<Move>) {
        for to in attacks & !self.own {
            let kind = if self.enemy.get_bit(to) {
                MoveKind::Capture
            } else {
                MoveKind::Quiet
            };
            out.push(Move::new(from, to, kind));
        }
    }

    fn pawn(&self, from: Square, out: &mut Vec<Move>) {
        let forward = self.side.forward();
        let promotes = |to: Square| to.rank() == self.side.promotion_rank();

        // Pushes
        if let Some(one) = from.jump(0, forward)
            && !self.occupied.get_bit(one)
        {
            if promotes(one) {
                push_promotions(from, one, false, out);
            } else {
                out.push(Move::new(from, one, MoveKind::Quiet));
                if from.rank() == self.side.pawn_rank()
                    && let Some(two) = one.jump(0, forward)
                    && !self.occupied.get_bit(two)
                {
                    out.push(Move::new(from, two, MoveKind::DoublePush));
                }
            }
        }

        // Captures, then en passant
        for df in [-1, 1] {
            let Some(to) = from.jump(df, forward) else {
                continue;
            };
            if self.enemy.get_bit(to) {
                if promotes(to) {
                    push_promotions(from, to, true, out);
                } else {
                    out.push(Move::new(from, to, MoveKind::Capture));
                }
            } else if self.is_en_passant_target(to) {
                out.push(Move::new(from, to, MoveKind::EnPassant));
            }
        }
    }

    /// `to` is a usable en-passant landing square: it is the recorded target,
    /// it is empty and on our sixth rank, and an enemy pawn actually stands
    /// just past it. A stale or
    /// inconsistent target simply yields no move.
    fn is_en_passant_target(&self, to: Square) -> bool {
        if self.side != self.pos.side_to_move() || self.pos.en_passant() != Some(to) {
            return false;
        }
        let sixth_rank = self.side.promotion_rank() as i8 - 2 * self.side.forward();
        if self.occupied.get_bit(to) || to.rank() as i8 != sixth_rank {
            return false;
        }
        match to.jump(0, -self.side.forward()) {
            Some(victim) => self
                .pos
                .pieces(self.side.other(), PieceKind::Pawn)
                .get_bit(victim),
            None => false,
        }
    }

    fn castles(&self, king_from: Square, out: &mut Vec<Move>) {
        let rights = self.pos.castling();
        let rooks = self.pos.pieces(self.side, PieceKind::Rook);
        let enemy = self.side.other();

        for castle in castles_for(self.side) {
            if !rights.contains(castle.right)
                || king_from != castle.king_from
                || !rooks.get_bit(castle.rook_from)
                || !(castle.between & self.occupied).is_empty()
            {
                continue;
            }
            if castle
                .king_path
                .into_iter()
                .any(|sq| self.pos.is_square_attacked(sq, enemy))
            {
                continue;
            }
            out.push(Move::new(king_from, castle.king_to, MoveKind::Castle));
        }
    }
}

/// Four moves, queen first, for a pawn reaching the last rank.
fn push_promotions(from: Square, to: Square, capture: bool, out: &mut Vec<Move>) {
    for piece in PieceKind::PROMOTIONS {
        if let Some(kind) = MoveKind::promoting_to(piece, capture) {
            out.push(Move::new(from, to, kind));
        }
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;

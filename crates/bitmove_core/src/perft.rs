//! Perft: count move paths to a fixed depth.
//!
//! The generator is pseudo-legal, so [`perft`] counts pseudo-legal paths. To
//! count legal paths, pass a child filter to [`perft_filtered`] that rejects
//! positions where the side that just moved left its king attacked.

use tracing::debug;

use crate::{
    chess_move::Move,
    movegen::pseudo_moves_into,
    position::Position,
};

/// Pseudo-legal path count from `pos` down to `depth`.
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    perft_filtered(pos, depth, &|_: &Position| true)
}

/// Path count where a move is followed only if `keep(&child)` holds for the
/// position it leads to.
pub fn perft_filtered<F>(pos: &mut Position, depth: u8, keep: &F) -> u64
where
    F: Fn(&Position) -> bool,
{
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    count(pos, depth, keep, &mut layers[..])
}

fn count<F>(pos: &mut Position, depth: u8, keep: &F, layers: &mut [Vec<Move>]) -> u64
where
    F: Fn(&Position) -> bool,
{
    if depth == 0 {
        return 1;
    }

    let (buf, rest) = layers
        .split_first_mut()
        .expect("perft requires one buffer per remaining ply");
    pseudo_moves_into(pos, pos.side_to_move(), buf);

    let mut nodes = 0u64;
    for mv in buf.iter().copied() {
        let undo = pos.make_move(mv);
        if keep(pos) {
            nodes += count(pos, depth - 1, keep, rest);
        }
        pos.unmake_move(mv, undo);
    }
    nodes
}

/// Per-root-move counts at `depth` (so each entry counts `depth - 1` plies
/// below its move). Moves rejected by `keep` are left out.
pub fn perft_divide<F>(pos: &mut Position, depth: u8, keep: &F) -> Vec<(Move, u64)>
where
    F: Fn(&Position) -> bool,
{
    if depth == 0 {
        return Vec::new();
    }
    let mut roots = Vec::with_capacity(64);
    pseudo_moves_into(pos, pos.side_to_move(), &mut roots);

    let mut layers = vec![Vec::with_capacity(64); depth as usize - 1];
    let mut out = Vec::with_capacity(roots.len());
    for mv in roots {
        let undo = pos.make_move(mv);
        if keep(pos) {
            let nodes = count(pos, depth - 1, keep, &mut layers[..]);
            debug!(%mv, nodes, "divide");
            out.push((mv, nodes));
        }
        pos.unmake_move(mv, undo);
    }
    out
}

//! Shared helpers for integration tests.

use bitmove_core::Position;

/// Child filter for legal perft: the side that just moved must not have left
/// its own king attacked.
pub fn leaves_king_safe(child: &Position) -> bool {
    let mover = child.side_to_move().other();
    match child.king_square(mover) {
        Some(king) => !child.is_square_attacked(king, child.side_to_move()),
        None => true,
    }
}

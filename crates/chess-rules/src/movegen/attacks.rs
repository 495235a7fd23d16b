//! Attack and check detection.
//!
//! Attacks are derived from ordinary move generation, with one exception:
//! kings contribute only their basic reach. Full king generation includes
//! castling, and castling asks whether squares are attacked, so using it
//! here would never terminate.

use super::{pseudo_legal_moves, KING_OFFSETS};
use crate::position::Position;
use chess_core::{Color, PieceKind, Square};

/// Returns the in-bounds neighbours of `from`.
///
/// No friendliness filter and no castling. Only attack detection uses this.
pub fn basic_king_reach(from: Square) -> impl Iterator<Item = Square> {
    KING_OFFSETS
        .into_iter()
        .filter_map(move |(dr, dc)| from.offset(dr, dc))
}

/// Returns true if any piece of `by_color` can reach `sq`.
pub fn is_square_attacked(position: &Position, sq: Square, by_color: Color) -> bool {
    position
        .board
        .pieces_of(by_color)
        .any(|(from, piece)| match piece.kind {
            PieceKind::King => basic_king_reach(from).any(|to| to == sq),
            _ => pseudo_legal_moves(position, from).contains(&sq),
        })
}

/// Returns true if the king of the given color is in check.
///
/// A position without that king reports no check.
pub fn king_in_check(position: &Position, color: Color) -> bool {
    match position.board.find_king(color) {
        Some(king_sq) => is_square_attacked(position, king_sq, color.opposite()),
        None => false,
    }
}

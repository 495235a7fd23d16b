//! King-safety filter over pseudo-legal moves.

use crate::movegen::{king_in_check, pseudo_legal_moves};
use crate::position::Position;
use chess_core::{Color, Square};

/// Returns true if moving the piece on `from` to `to` is legal.
///
/// The destination must be pseudo-legal, and after moving the piece the
/// mover's own king must not be in check. The move is simulated on a copy of
/// the position, so the caller's position is never written.
///
/// Turn order is not checked here; the game enforces it.
pub fn is_legal(position: &Position, from: Square, to: Square) -> bool {
    if !pseudo_legal_moves(position, from).contains(&to) {
        return false;
    }
    leaves_king_safe(position, from, to)
}

/// Simulates `from -> to` without validating the move pattern and reports
/// whether the mover's king is safe afterwards.
///
/// Only the two squares involved change in the simulation. For a castling
/// move only the king is simulated.
pub(crate) fn leaves_king_safe(position: &Position, from: Square, to: Square) -> bool {
    let Some(piece) = position.board.piece_at(from) else {
        return false;
    };

    let mut scratch = *position;
    scratch.board.set(to, Some(piece));
    scratch.board.set(from, None);
    !king_in_check(&scratch, piece.color)
}

/// Returns the legal destinations of the piece on `from`.
pub fn legal_moves(position: &Position, from: Square) -> Vec<Square> {
    pseudo_legal_moves(position, from)
        .into_iter()
        .filter(|&to| leaves_king_safe(position, from, to))
        .collect()
}

/// Returns true if any piece of `color` has a legal move.
pub fn has_legal_move(position: &Position, color: Color) -> bool {
    position.board.pieces_of(color).any(|(from, _)| {
        pseudo_legal_moves(position, from)
            .into_iter()
            .any(|to| leaves_king_safe(position, from, to))
    })
}

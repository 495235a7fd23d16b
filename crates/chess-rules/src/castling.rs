//! Castling preconditions and the king + rook relocation.

use crate::movegen::is_square_attacked;
use crate::position::{CastleSide, Position};
use chess_core::{Color, Piece, PieceKind, Square};

/// Returns true if `color` may castle toward `side` in this position.
///
/// Checked in order:
/// 1. the king has not moved and still stands on its home square;
/// 2. the rook has not moved and a rook of the same color stands on its corner;
/// 3. every square strictly between them is empty;
/// 4. the king is not attacked on its home square, the square it passes
///    through, or its destination.
///
/// The attack probes use [`is_square_attacked`], which never generates
/// castling moves, so this cannot recurse into itself.
pub fn can_castle(position: &Position, color: Color, side: CastleSide) -> bool {
    let (Some(king_sq), Some(rook_sq)) = (CastleSide::king_square(color), side.rook_square(color))
    else {
        return false;
    };
    let board = &position.board;

    if !position.castling.may_castle(color, side) {
        return false;
    }

    if board.piece_at(king_sq) != Some(Piece::new(color, PieceKind::King))
        || board.piece_at(rook_sq) != Some(Piece::new(color, PieceKind::Rook))
    {
        return false;
    }

    if !path_between(king_sq, rook_sq, side).all(|sq| board.is_empty(sq)) {
        return false;
    }

    let them = color.opposite();
    let dir = side.direction();
    (0..=2)
        .filter_map(|step| king_sq.offset(0, dir * step))
        .all(|sq| !is_square_attacked(position, sq, them))
}

/// Relocates king and rook for a castle and records both as moved.
///
/// Returns `false` without touching the position when [`can_castle`] fails.
/// The side to move is left unchanged; the game flips it.
pub fn castle(position: &mut Position, color: Color, side: CastleSide) -> bool {
    if !can_castle(position, color, side) {
        return false;
    }

    let back = color.back_row();
    let squares = (
        CastleSide::king_square(color),
        side.rook_square(color),
        Square::new(back, side.king_target_col()),
        Square::new(back, side.rook_target_col()),
    );
    let (Some(king_from), Some(rook_from), Some(king_to), Some(rook_to)) = squares else {
        return false;
    };

    let board = &mut position.board;
    let king = board.take(king_from);
    let rook = board.take(rook_from);
    board.set(king_to, king);
    board.set(rook_to, rook);

    position.castling.mark_king_moved(color);
    position.castling.mark_rook_moved(color, side);

    tracing::debug!(%color, %side, "castled");
    true
}

/// Squares strictly between the king and rook home squares.
fn path_between(king_sq: Square, rook_sq: Square, side: CastleSide) -> impl Iterator<Item = Square> {
    let dir = side.direction();
    let span = king_sq.col().abs_diff(rook_sq.col()) as i8;
    (1..span).filter_map(move |step| king_sq.offset(0, dir * step))
}

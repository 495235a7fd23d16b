//! Move generation.
//!
//! Moves are produced as destination squares for the piece on a given
//! square. Generation is pseudo-legal: it follows each piece's movement
//! pattern but does not check whether the mover's own king is left in check.
//! That is the job of [`crate::legality`].

mod attacks;

use crate::castling::can_castle;
use crate::position::{CastleSide, Position};
use crate::Board;
use chess_core::{Color, PieceKind, Square};

pub use attacks::{basic_king_reach, is_square_attacked, king_in_check};

/// Knight jump offsets as (row delta, column delta).
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// The eight neighbouring squares as (row delta, column delta).
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Generates the pseudo-legal destinations of the piece on `from`.
///
/// Returns an empty list for an empty square. The side to move is not
/// consulted; a piece of either color can be queried.
pub fn pseudo_legal_moves(position: &Position, from: Square) -> Vec<Square> {
    let Some(piece) = position.board.piece_at(from) else {
        return Vec::new();
    };

    let board = &position.board;
    let us = piece.color;
    let mut moves = Vec::new();

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, us, &mut moves),
        PieceKind::Knight => generate_step_moves(board, from, us, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop => generate_ray_moves(board, from, us, &BISHOP_DIRECTIONS, &mut moves),
        PieceKind::Rook => generate_ray_moves(board, from, us, &ROOK_DIRECTIONS, &mut moves),
        PieceKind::Queen => {
            generate_ray_moves(board, from, us, &ROOK_DIRECTIONS, &mut moves);
            generate_ray_moves(board, from, us, &BISHOP_DIRECTIONS, &mut moves);
        }
        PieceKind::King => {
            generate_step_moves(board, from, us, &KING_OFFSETS, &mut moves);
            generate_castling_moves(position, from, us, &mut moves);
        }
    }

    moves
}

/// Generates pawn pushes and diagonal captures. There is no en passant.
fn generate_pawn_moves(board: &Board, from: Square, us: Color, moves: &mut Vec<Square>) {
    let dir = us.pawn_direction();

    // Single push, then double push from the starting row
    if let Some(one) = from.offset(dir, 0).filter(|&sq| board.is_empty(sq)) {
        moves.push(one);
        if from.row() == us.pawn_row() {
            if let Some(two) = one.offset(dir, 0).filter(|&sq| board.is_empty(sq)) {
                moves.push(two);
            }
        }
    }

    // Captures land only on enemy pieces
    for dc in [-1, 1] {
        if let Some(to) = from.offset(dir, dc) {
            if is_enemy(board, to, us) {
                moves.push(to);
            }
        }
    }
}

/// Generates single-step moves (knight, king) that do not land on a friendly piece.
fn generate_step_moves(
    board: &Board,
    from: Square,
    us: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Square>,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            if !is_friendly(board, to, us) {
                moves.push(to);
            }
        }
    }
}

/// Generates sliding moves along each direction until blocked.
///
/// A blocking enemy square is included as a capture; a blocking friendly
/// square is not.
fn generate_ray_moves(
    board: &Board,
    from: Square,
    us: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Square>,
) {
    for &(dr, dc) in directions {
        let mut cursor = from.offset(dr, dc);
        while let Some(to) = cursor {
            match board.piece_at(to) {
                None => moves.push(to),
                Some(piece) => {
                    if piece.color != us {
                        moves.push(to);
                    }
                    break;
                }
            }
            cursor = to.offset(dr, dc);
        }
    }
}

/// Adds the two-column king moves the castling arbiter allows.
fn generate_castling_moves(position: &Position, from: Square, us: Color, moves: &mut Vec<Square>) {
    for side in CastleSide::ALL {
        if can_castle(position, us, side) {
            if let Some(to) = from.with_col(side.king_target_col()) {
                moves.push(to);
            }
        }
    }
}

#[inline]
fn is_friendly(board: &Board, sq: Square, us: Color) -> bool {
    board.piece_at(sq).is_some_and(|p| p.color == us)
}

#[inline]
fn is_enemy(board: &Board, sq: Square, us: Color) -> bool {
    board.piece_at(sq).is_some_and(|p| p.color != us)
}

//! Chess position representation.

use chess_core::{Color, Square};

use crate::Board;

/// The two directions a king can castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Both sides, kingside first.
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// Column of the king before castling.
    pub const KING_COL: u8 = 4;

    /// Returns the side a king move of `dc` columns castles toward.
    pub const fn from_delta(dc: i8) -> Option<Self> {
        match dc {
            2 => Some(CastleSide::Kingside),
            -2 => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    /// Column step from the king toward the rook.
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        }
    }

    /// Column of the rook before castling.
    #[inline]
    pub const fn rook_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// Column the king lands on.
    #[inline]
    pub const fn king_target_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    /// Column the rook lands on.
    #[inline]
    pub const fn rook_target_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }

    /// Home square of the king of the given color.
    pub fn king_square(color: Color) -> Option<Square> {
        Square::new(color.back_row(), Self::KING_COL)
    }

    /// Corner square of this side's rook for the given color.
    pub fn rook_square(self, color: Color) -> Option<Square> {
        Square::new(color.back_row(), self.rook_col())
    }

    /// Returns the side whose rook starts on `sq` for `color`, if any.
    pub fn from_rook_square(color: Color, sq: Square) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|side| side.rook_square(color) == Some(sq))
    }
}

impl std::fmt::Display for CastleSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CastleSide::Kingside => write!(f, "kingside"),
            CastleSide::Queenside => write!(f, "queenside"),
        }
    }
}

/// Which castling pieces have moved, per color.
///
/// Flags only ever go from unmoved to moved; there is no way to clear one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    king_moved: [bool; 2],
    kingside_rook_moved: [bool; 2],
    queenside_rook_moved: [bool; 2],
}

impl CastlingRights {
    /// Rights with nothing moved yet.
    pub const NONE_MOVED: CastlingRights = CastlingRights {
        king_moved: [false; 2],
        kingside_rook_moved: [false; 2],
        queenside_rook_moved: [false; 2],
    };

    /// Returns true if the king of the given color has moved.
    #[inline]
    pub const fn king_moved(&self, color: Color) -> bool {
        self.king_moved[color.index()]
    }

    /// Returns true if the given rook has moved (or been captured on its corner).
    #[inline]
    pub const fn rook_moved(&self, color: Color, side: CastleSide) -> bool {
        match side {
            CastleSide::Kingside => self.kingside_rook_moved[color.index()],
            CastleSide::Queenside => self.queenside_rook_moved[color.index()],
        }
    }

    /// Returns true if neither the king nor the given rook has moved.
    #[inline]
    pub const fn may_castle(&self, color: Color, side: CastleSide) -> bool {
        !self.king_moved(color) && !self.rook_moved(color, side)
    }

    /// Records that the king of the given color has moved.
    #[inline]
    pub fn mark_king_moved(&mut self, color: Color) {
        self.king_moved[color.index()] = true;
    }

    /// Records that the given rook has moved.
    #[inline]
    pub fn mark_rook_moved(&mut self, color: Color, side: CastleSide) {
        match side {
            CastleSide::Kingside => self.kingside_rook_moved[color.index()] = true,
            CastleSide::Queenside => self.queenside_rook_moved[color.index()] = true,
        }
    }
}

/// Board placement plus the state that move generation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Piece placement.
    pub board: Board,

    /// The side to move.
    pub side_to_move: Color,

    /// Moved flags for kings and rooks.
    pub castling: CastlingRights,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// Creates a position from an arbitrary board with nothing marked as moved.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Position {
            board,
            side_to_move,
            castling: CastlingRights::NONE_MOVED,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos() {
        let pos = Position::startpos();
        assert_eq!(pos.side_to_move, Color::White);
        assert_eq!(pos.castling, CastlingRights::NONE_MOVED);
        assert_eq!(pos.board, Board::standard());
    }

    #[test]
    fn castling_rights_are_independent() {
        let mut rights = CastlingRights::NONE_MOVED;
        assert!(rights.may_castle(Color::White, CastleSide::Kingside));

        rights.mark_rook_moved(Color::White, CastleSide::Kingside);
        assert!(!rights.may_castle(Color::White, CastleSide::Kingside));
        assert!(rights.may_castle(Color::White, CastleSide::Queenside));
        assert!(rights.may_castle(Color::Black, CastleSide::Kingside));

        rights.mark_king_moved(Color::Black);
        assert!(!rights.may_castle(Color::Black, CastleSide::Kingside));
        assert!(!rights.may_castle(Color::Black, CastleSide::Queenside));
        assert!(rights.may_castle(Color::White, CastleSide::Queenside));
    }

    #[test]
    fn marking_twice_keeps_flag_set() {
        let mut rights = CastlingRights::NONE_MOVED;
        rights.mark_king_moved(Color::White);
        rights.mark_king_moved(Color::White);
        assert!(rights.king_moved(Color::White));
    }

    #[test]
    fn side_geometry() {
        assert_eq!(CastleSide::king_square(Color::White), Some(Square::E1));
        assert_eq!(CastleSide::king_square(Color::Black), Some(Square::E8));
        assert_eq!(
            CastleSide::Kingside.rook_square(Color::White),
            Some(Square::H1)
        );
        assert_eq!(
            CastleSide::Queenside.rook_square(Color::Black),
            Some(Square::A8)
        );
        assert_eq!(
            CastleSide::from_rook_square(Color::White, Square::A1),
            Some(CastleSide::Queenside)
        );
        assert_eq!(CastleSide::from_rook_square(Color::White, Square::A8), None);
        assert_eq!(CastleSide::from_delta(2), Some(CastleSide::Kingside));
        assert_eq!(CastleSide::from_delta(-2), Some(CastleSide::Queenside));
        assert_eq!(CastleSide::from_delta(1), None);
    }
}

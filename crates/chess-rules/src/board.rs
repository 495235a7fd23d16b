//! Mailbox board representation.

use chess_core::{Color, Piece, PieceKind, Square, BOARD_SIZE};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing a board diagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("invalid board diagram: expected 8 rows, got {0}")]
    InvalidRowCount(usize),

    #[error("invalid board diagram: row {row} has {len} cells, expected 8")]
    InvalidRowLength { row: usize, len: usize },

    #[error("invalid board diagram: unknown piece '{ch}' in row {row}")]
    UnknownPiece { row: usize, ch: char },
}

/// An 8x8 grid of optional pieces.
///
/// The board is plain data: it knows nothing about whose turn it is or which
/// moves are legal. Writes through [`Board::set`] are unchecked.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting position.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for color in Color::ALL {
            for col in 0..BOARD_SIZE {
                let back = Square::new(color.back_row(), col);
                let pawn = Square::new(color.pawn_row(), col);
                if let (Some(back), Some(pawn)) = (back, pawn) {
                    let kind = PieceKind::BACK_RANK[col as usize];
                    board.set(back, Some(Piece::new(color, kind)));
                    board.set(pawn, Some(Piece::new(color, PieceKind::Pawn)));
                }
            }
        }
        board
    }

    /// Parses a board from a diagram of eight rows.
    ///
    /// Each row holds eight cells, row 0 (Black's back rank) first. A cell is
    /// a piece letter (uppercase White, lowercase Black) or `.` for empty.
    /// Whitespace inside a row is ignored and blank lines are skipped.
    pub fn from_diagram(diagram: &str) -> Result<Self, DiagramError> {
        let rows: Vec<&str> = diagram
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(DiagramError::InvalidRowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != BOARD_SIZE as usize {
                return Err(DiagramError::InvalidRowLength {
                    row,
                    len: cells.len(),
                });
            }
            for (col, &ch) in cells.iter().enumerate() {
                if ch == '.' {
                    continue;
                }
                let piece = Piece::from_char(ch).ok_or(DiagramError::UnknownPiece { row, ch })?;
                if let Some(sq) = Square::new(row as u8, col as u8) {
                    board.set(sq, Some(piece));
                }
            }
        }
        Ok(board)
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize]
    }

    /// Places or removes a piece without any rule checks.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index() as usize] = piece;
    }

    /// Removes and returns the piece on the given square.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize].take()
    }

    /// Returns true if the square holds no piece.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Iterates over occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Iterates over the squares occupied by the given color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Returns the square of the first king of the given color in row-major order.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.is(color, PieceKind::King))
            .map(|(sq, _)| sq)
    }

    /// Returns the number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().count()
    }

    /// Writes the board as a diagram, optionally with Unicode glyphs.
    pub fn render(&self, f: &mut impl fmt::Write, unicode: bool) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            write!(f, "{} ", BOARD_SIZE - row)?;
            for col in 0..BOARD_SIZE {
                let cell = Square::new(row, col)
                    .and_then(|sq| self.piece_at(sq))
                    .map(|p| if unicode { p.glyph() } else { p.to_char() })
                    .unwrap_or('.');
                write!(f, " {}", cell)?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", (b'a' + col) as char)?;
        }
        writeln!(f)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board")?;
        self.render(f, false)
    }
}

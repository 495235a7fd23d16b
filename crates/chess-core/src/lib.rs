//! Core types for chess.
//!
//! This crate provides the fundamental types shared by the rules engine and
//! its front ends:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates

mod color;
mod piece;
mod square;

pub use color::Color;
pub use piece::{Piece, PieceKind};
pub use square::{Square, SquareParseError, BOARD_SIZE};

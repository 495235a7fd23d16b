//! Two-player chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - 8x8 mailbox of optional pieces
//! - [`Position`] - board plus side to move and castling flags
//! - [`Game`] - the state machine that enforces turns, captures, castling
//!   and promotion
//! - Pseudo-legal move generation, attack detection and the king-safety
//!   filter as free functions over a [`Position`]
//!
//! # Architecture
//!
//! Move generation is two-tier. Ordinary generation includes castling for
//! kings, and castling asks whether squares are attacked. Attack detection
//! therefore uses a basic king reach (the eight neighbours, nothing else)
//! so the two never call each other in a loop.
//!
//! # Example
//!
//! ```
//! use chess_core::{Color, Square};
//! use chess_rules::{Game, GameStatus};
//!
//! let mut game = Game::new();
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//!
//! assert!(game.safe_moves(e2).contains(&e4));
//! game.apply_move(e2, e4).unwrap();
//! assert_eq!(game.side_to_move(), Color::Black);
//! assert_eq!(game.status(), GameStatus::Ongoing);
//! ```

mod board;
pub mod castling;
mod game;
pub mod legality;
pub mod movegen;
mod position;

pub use board::{Board, DiagramError};
pub use castling::can_castle;
pub use game::{Game, GameStatus, MoveError, MoveOutcome, PromotionListener};
pub use legality::{has_legal_move, is_legal, legal_moves};
pub use movegen::{basic_king_reach, is_square_attacked, king_in_check, pseudo_legal_moves};
pub use position::{CastleSide, CastlingRights, Position};

//! Game state machine.
//!
//! The [`Game`] struct owns the authoritative position and is the only way
//! to change it during play:
//! - Turn alternation
//! - Captured-piece ledgers
//! - Castling through the arbiter
//! - The pawn promotion signal
//!
//! Check, checkmate and stalemate are never stored; every query derives them
//! from the current board.

use crate::castling;
use crate::legality::{self, has_legal_move};
use crate::movegen::{king_in_check, pseudo_legal_moves};
use crate::position::{CastleSide, CastlingRights, Position};
use crate::Board;
use chess_core::{Color, Piece, PieceKind, Square};
use std::fmt;
use thiserror::Error;

/// Why a move or castle was rejected. The game is unchanged in every case.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MoveError {
    /// There is no piece on the source square.
    #[error("no piece on {0}")]
    EmptySquare(Square),
    /// The piece belongs to the side that is not to move.
    #[error("it is {expected}'s turn, not {found}'s")]
    WrongTurn { expected: Color, found: Color },
    /// The piece cannot move to the destination.
    #[error("{piece} on {from} cannot move to {to}")]
    IllegalDestination { piece: Piece, from: Square, to: Square },
    /// The move would leave the mover's own king in check.
    #[error("moving {from} to {to} leaves the {color} king in check")]
    LeavesKingInCheck { color: Color, from: Square, to: Square },
    /// A castling precondition failed.
    #[error("{color} cannot castle {side}")]
    CastlingNotAllowed { color: Color, side: CastleSide },
}

/// What a successful command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The piece that moved (the king, for a castle).
    pub piece: Piece,
    /// Source square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// The opposing piece removed from the destination, if any.
    pub captured: Option<Piece>,
    /// Set when the command was a castle.
    pub castle: Option<CastleSide>,
    /// Set when a pawn reached the last rank and awaits replacement.
    pub promotion: Option<Square>,
}

/// Status of the side to move, derived from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Play continues and the side to move is not in check.
    Ongoing,
    /// The given side is in check but has a legal move.
    Check(Color),
    /// The given side is checkmated.
    Checkmate(Color),
    /// The given side has no legal move and is not in check.
    Stalemate(Color),
}

impl GameStatus {
    /// Returns true for checkmate and stalemate.
    pub const fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate(_) | GameStatus::Stalemate(_))
    }
}

/// Receives the promotion signal raised when a pawn reaches the last rank.
///
/// Called synchronously from [`Game::apply_move`] after the pawn has been
/// placed. The receiver is expected to call [`Game::resolve_promotion`]
/// later; the game does not wait for it.
pub trait PromotionListener {
    fn on_promotion(&mut self, square: Square, color: Color);
}

impl<F> PromotionListener for F
where
    F: FnMut(Square, Color),
{
    fn on_promotion(&mut self, square: Square, color: Color) {
        self(square, color)
    }
}

/// A two-player game from a starting position.
pub struct Game {
    /// Current position.
    position: Position,
    /// Pieces taken, indexed by the color that took them.
    captured: [Vec<Piece>; 2],
    /// Pawn awaiting replacement.
    pending_promotion: Option<(Square, Color)>,
    /// Receiver of the promotion signal.
    listener: Option<Box<dyn PromotionListener>>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("position", &self.position)
            .field("captured", &self.captured)
            .field("pending_promotion", &self.pending_promotion)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Game {
    /// Creates a new game with the standard starting position, White to move.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a game from an arbitrary board. No king or rook counts as moved.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Self::from_position(Position::from_board(board, side_to_move))
    }

    /// Creates a game from a position.
    pub fn from_position(position: Position) -> Self {
        Game {
            position,
            captured: [Vec::new(), Vec::new()],
            pending_promotion: None,
            listener: None,
        }
    }

    /// Registers the receiver of the promotion signal, replacing any previous one.
    pub fn set_promotion_listener(&mut self, listener: impl PromotionListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Returns the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.position.board
    }

    /// Returns the piece on the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.position.board.piece_at(sq)
    }

    /// Returns the side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Returns the moved flags for kings and rooks.
    pub fn castling_rights(&self) -> CastlingRights {
        self.position.castling
    }

    /// Returns the pieces captured by `color`, oldest first.
    pub fn captured_pieces(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// Returns the pawn awaiting replacement, if any.
    pub fn pending_promotion(&self) -> Option<(Square, Color)> {
        self.pending_promotion
    }

    /// Returns the square of the given color's king.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.position.board.find_king(color)
    }

    /// Returns the pseudo-legal destinations of the piece on `sq`.
    ///
    /// These may leave the mover's king in check; use
    /// [`safe_moves`](Self::safe_moves) for the filtered list.
    pub fn legal_moves(&self, sq: Square) -> Vec<Square> {
        pseudo_legal_moves(&self.position, sq)
    }

    /// Returns the destinations of the piece on `sq` that keep its king safe.
    pub fn safe_moves(&self, sq: Square) -> Vec<Square> {
        legality::legal_moves(&self.position, sq)
    }

    /// Returns true if moving `from -> to` is pseudo-legal and keeps the
    /// mover's king safe. Turn order is not considered.
    pub fn is_legal(&self, from: Square, to: Square) -> bool {
        legality::is_legal(&self.position, from, to)
    }

    /// Returns true if the king of the given color is in check.
    pub fn king_in_check(&self, color: Color) -> bool {
        king_in_check(&self.position, color)
    }

    /// Returns true if `color` is in check and has no legal move.
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.king_in_check(color) && !has_legal_move(&self.position, color)
    }

    /// Returns true if `color` is not in check and has no legal move.
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.king_in_check(color) && !has_legal_move(&self.position, color)
    }

    /// Returns the status of the side to move.
    pub fn status(&self) -> GameStatus {
        let color = self.side_to_move();
        let in_check = self.king_in_check(color);
        match (in_check, has_legal_move(&self.position, color)) {
            (true, false) => GameStatus::Checkmate(color),
            (false, false) => GameStatus::Stalemate(color),
            (true, true) => GameStatus::Check(color),
            (false, true) => GameStatus::Ongoing,
        }
    }

    /// Returns true if `color` may castle toward `side` right now.
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        castling::can_castle(&self.position, color, side)
    }

    /// Moves the piece on `from` to `to`.
    ///
    /// Rejected without any change when the square is empty, the piece is not
    /// the side to move's, the destination is not pseudo-legal, or the move
    /// leaves the mover's king in check. A two-column king move is a castle
    /// and is re-validated by [`castle`](Self::castle).
    ///
    /// When a pawn lands on the last rank the move is committed as a pawn,
    /// the promotion listener is notified, and the outcome's `promotion` is
    /// set. Further moves are not blocked while a promotion is pending.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        let piece = self.piece_at(from).ok_or(MoveError::EmptySquare(from))?;
        let us = self.side_to_move();
        if piece.color != us {
            return Err(MoveError::WrongTurn {
                expected: us,
                found: piece.color,
            });
        }

        if !pseudo_legal_moves(&self.position, from).contains(&to) {
            return Err(MoveError::IllegalDestination { piece, from, to });
        }

        if piece.kind == PieceKind::King && from.row() == to.row() {
            let dc = to.col() as i8 - from.col() as i8;
            if let Some(side) = CastleSide::from_delta(dc) {
                return self.castle(us, side);
            }
        }

        if !legality::leaves_king_safe(&self.position, from, to) {
            return Err(MoveError::LeavesKingInCheck {
                color: us,
                from,
                to,
            });
        }

        let captured = self.position.board.piece_at(to);
        self.position.board.set(to, Some(piece));
        self.position.board.set(from, None);
        self.record_moved(piece, from);

        if let Some(taken) = captured {
            self.record_captured(us, taken, to);
        }

        self.position.side_to_move = us.opposite();
        tracing::debug!(%piece, %from, %to, captured = ?captured, "move applied");

        let promotion = if piece.kind == PieceKind::Pawn && to.row() == us.promotion_row() {
            self.pending_promotion = Some((to, us));
            tracing::info!(square = %to, color = %us, "pawn awaiting promotion");
            if let Some(listener) = self.listener.as_mut() {
                listener.on_promotion(to, us);
            }
            Some(to)
        } else {
            None
        };

        Ok(MoveOutcome {
            piece,
            from,
            to,
            captured,
            castle: None,
            promotion,
        })
    }

    /// Castles `color` toward `side`.
    ///
    /// Only the side to move may castle; otherwise [`MoveError::WrongTurn`]
    /// is returned. The preconditions are always re-checked here. On failure
    /// nothing changes and [`MoveError::CastlingNotAllowed`] is returned. A
    /// successful castle flips the side to move like any other move.
    pub fn castle(&mut self, color: Color, side: CastleSide) -> Result<MoveOutcome, MoveError> {
        let us = self.side_to_move();
        if color != us {
            return Err(MoveError::WrongTurn {
                expected: us,
                found: color,
            });
        }

        let not_allowed = MoveError::CastlingNotAllowed { color, side };
        let from = CastleSide::king_square(color).ok_or(not_allowed)?;
        let to = from.with_col(side.king_target_col()).ok_or(not_allowed)?;

        if !castling::castle(&mut self.position, color, side) {
            return Err(not_allowed);
        }

        self.position.side_to_move = us.opposite();
        Ok(MoveOutcome {
            piece: Piece::new(color, PieceKind::King),
            from,
            to,
            captured: None,
            castle: Some(side),
            promotion: None,
        })
    }

    /// Replaces the piece on `sq` with `piece` and clears the pending promotion.
    ///
    /// The square, rank and color are not checked; the caller is trusted.
    pub fn resolve_promotion(&mut self, sq: Square, piece: Piece) {
        self.position.board.set(sq, Some(piece));
        self.pending_promotion = None;
        tracing::info!(square = %sq, %piece, "promotion resolved");
    }

    /// Updates castling flags for a piece leaving `from`.
    fn record_moved(&mut self, piece: Piece, from: Square) {
        match piece.kind {
            PieceKind::King => self.position.castling.mark_king_moved(piece.color),
            PieceKind::Rook => {
                if let Some(side) = CastleSide::from_rook_square(piece.color, from) {
                    self.position.castling.mark_rook_moved(piece.color, side);
                }
            }
            _ => {}
        }
    }

    /// Adds a capture to the ledger. A rook taken on its corner loses its castling right.
    fn record_captured(&mut self, by: Color, taken: Piece, on: Square) {
        self.captured[by.index()].push(taken);
        if taken.kind == PieceKind::Rook {
            if let Some(side) = CastleSide::from_rook_square(taken.color, on) {
                self.position.castling.mark_rook_moved(taken.color, side);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn game(diagram: &str, side_to_move: Color) -> Game {
        Game::from_board(Board::from_diagram(diagram).unwrap(), side_to_move)
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.board().piece_count(), 32);
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert!(game.captured_pieces(Color::White).is_empty());
        assert!(game.captured_pieces(Color::Black).is_empty());
        assert_eq!(game.pending_promotion(), None);
    }

    #[test]
    fn moves_alternate_turns() {
        let mut game = Game::new();
        game.apply_move(sq("e2"), sq("e4")).unwrap();
        assert_eq!(game.side_to_move(), Color::Black);
        game.apply_move(sq("e7"), sq("e5")).unwrap();
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(
            game.piece_at(sq("e4")),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
    }

    #[test]
    fn wrong_turn_is_rejected() {
        let mut game = Game::new();
        let err = game.apply_move(sq("e7"), sq("e5")).unwrap_err();
        assert_eq!(
            err,
            MoveError::WrongTurn {
                expected: Color::White,
                found: Color::Black
            }
        );
        assert_eq!(game.position(), &Position::startpos());
    }

    #[test]
    fn empty_square_and_bad_destination_are_rejected() {
        let mut game = Game::new();
        assert_eq!(
            game.apply_move(sq("e4"), sq("e5")),
            Err(MoveError::EmptySquare(sq("e4")))
        );
        assert!(matches!(
            game.apply_move(sq("e2"), sq("e5")),
            Err(MoveError::IllegalDestination { .. })
        ));
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.position(), &Position::startpos());
    }

    #[test]
    fn capture_goes_to_capturing_side_ledger() {
        let mut game = Game::new();
        game.apply_move(sq("e2"), sq("e4")).unwrap();
        game.apply_move(sq("d7"), sq("d5")).unwrap();
        let outcome = game.apply_move(sq("e4"), sq("d5")).unwrap();
        let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
        assert_eq!(outcome.captured, Some(black_pawn));
        assert_eq!(game.captured_pieces(Color::White), &[black_pawn]);
        assert!(game.captured_pieces(Color::Black).is_empty());
        assert_eq!(game.board().piece_count(), 31);
    }

    #[test]
    fn self_check_is_rejected_without_change() {
        let mut game = game(
            "
            . . . . r . . k
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . B . . .
            . . . . . . . .
            . . . . K . . .",
            Color::White,
        );
        let before = *game.position();
        let err = game.apply_move(sq("e3"), sq("d4")).unwrap_err();
        assert!(matches!(err, MoveError::LeavesKingInCheck { .. }));
        assert_eq!(game.position(), &before);
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn king_move_marks_king_moved() {
        let mut game = game(
            "
            r . . . k . . r
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            R . . . K . . R",
            Color::White,
        );
        game.apply_move(Square::E1, Square::F1).unwrap();
        assert!(game.castling_rights().king_moved(Color::White));
        game.apply_move(Square::E8, sq("e7")).unwrap();
        game.apply_move(Square::F1, Square::E1).unwrap();
        // Back on its home square, but the flag never resets
        assert!(!game.can_castle(Color::White, CastleSide::Kingside));
        assert!(!game.can_castle(Color::White, CastleSide::Queenside));
    }

    #[test]
    fn rook_move_marks_only_its_side() {
        let mut game = game(
            "
            r . . . k . . r
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            R . . . K . . R",
            Color::White,
        );
        game.apply_move(Square::H1, Square::G1).unwrap();
        let rights = game.castling_rights();
        assert!(rights.rook_moved(Color::White, CastleSide::Kingside));
        assert!(!rights.rook_moved(Color::White, CastleSide::Queenside));
        assert!(!rights.king_moved(Color::White));
    }

    #[test]
    fn rook_captured_on_corner_loses_right() {
        let mut game = game(
            "
            r . . . k . . r
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            R . . . K . . R",
            Color::White,
        );
        let outcome = game.apply_move(Square::A1, Square::A8).unwrap();
        assert_eq!(
            outcome.captured,
            Some(Piece::new(Color::Black, PieceKind::Rook))
        );
        assert!(game
            .castling_rights()
            .rook_moved(Color::Black, CastleSide::Queenside));
        assert!(!game.can_castle(Color::Black, CastleSide::Queenside));
    }

    #[test]
    fn castle_command_flips_turn() {
        let mut game = game(
            "
            r . . . k . . r
            p p p p p p p p
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            P P P P P P P P
            R . . . K . . R",
            Color::White,
        );
        let outcome = game.castle(Color::White, CastleSide::Kingside).unwrap();
        assert_eq!(outcome.castle, Some(CastleSide::Kingside));
        assert_eq!(outcome.to, Square::G1);
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(
            game.piece_at(Square::F1),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
    }

    #[test]
    fn castle_out_of_turn_is_rejected() {
        let mut game = game(
            "
            r . . . k . . r
            p p p p p p p p
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            P P P P P P P P
            R . . . K . . R",
            Color::White,
        );
        let before = *game.position();
        let err = game.castle(Color::Black, CastleSide::Kingside).unwrap_err();
        assert_eq!(
            err,
            MoveError::WrongTurn {
                expected: Color::White,
                found: Color::Black
            }
        );
        assert_eq!(game.position(), &before);
        assert_eq!(game.side_to_move(), Color::White);
        assert!(game.apply_move(sq("a7"), sq("a6")).is_err());
    }

    #[test]
    fn two_column_king_move_castles() {
        let mut game = game(
            "
            r . . . k . . r
            p p p p p p p p
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            P P P P P P P P
            R . . . K . . R",
            Color::White,
        );
        game.apply_move(Square::E1, Square::C1).unwrap();
        assert_eq!(
            game.piece_at(Square::D1),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert!(game.board().is_empty(Square::A1));

        let outcome = game.apply_move(Square::E8, Square::G8).unwrap();
        assert_eq!(outcome.castle, Some(CastleSide::Kingside));
        assert_eq!(
            game.piece_at(Square::F8),
            Some(Piece::new(Color::Black, PieceKind::Rook))
        );
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn failed_castle_changes_nothing() {
        let mut game = Game::new();
        let err = game.castle(Color::White, CastleSide::Kingside).unwrap_err();
        assert_eq!(
            err,
            MoveError::CastlingNotAllowed {
                color: Color::White,
                side: CastleSide::Kingside
            }
        );
        assert_eq!(game.position(), &Position::startpos());
    }

    #[test]
    fn promotion_signal_and_resolution() {
        let mut game = game(
            "
            . . . . . . . k
            P . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . K . . .",
            Color::White,
        );
        let seen = Rc::new(RefCell::new(Vec::<(Square, Color)>::new()));
        let sink = Rc::clone(&seen);
        game.set_promotion_listener(move |square: Square, color: Color| {
            sink.borrow_mut().push((square, color))
        });

        let outcome = game.apply_move(sq("a7"), Square::A8).unwrap();
        assert_eq!(outcome.promotion, Some(Square::A8));
        assert_eq!(seen.borrow().as_slice(), &[(Square::A8, Color::White)]);
        assert_eq!(game.pending_promotion(), Some((Square::A8, Color::White)));
        assert_eq!(
            game.piece_at(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );

        let queen = Piece::new(Color::White, PieceKind::Queen);
        game.resolve_promotion(Square::A8, queen);
        assert_eq!(game.piece_at(Square::A8), Some(queen));
        assert_eq!(game.pending_promotion(), None);
    }

    #[test]
    fn pending_promotion_does_not_block_moves() {
        let mut game = game(
            "
            . . . . . . . k
            P . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . K . . .",
            Color::White,
        );
        game.apply_move(sq("a7"), Square::A8).unwrap();
        assert!(game.pending_promotion().is_some());
        game.apply_move(Square::H8, sq("h7")).unwrap();
        game.apply_move(Square::E1, sq("e2")).unwrap();
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn resolve_promotion_trusts_the_caller() {
        let mut game = Game::new();
        let knight = Piece::new(Color::Black, PieceKind::Knight);
        game.resolve_promotion(sq("e4"), knight);
        assert_eq!(game.piece_at(sq("e4")), Some(knight));
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn resolve_promotion_always_clears_pending() {
        let mut game = game(
            "
            . . . . . . . k
            P . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . K . . .",
            Color::White,
        );
        game.apply_move(sq("a7"), Square::A8).unwrap();
        assert_eq!(game.pending_promotion(), Some((Square::A8, Color::White)));

        let queen = Piece::new(Color::White, PieceKind::Queen);
        game.resolve_promotion(Square::B8, queen);
        assert_eq!(game.piece_at(Square::B8), Some(queen));
        assert_eq!(game.pending_promotion(), None);
    }

    #[test]
    fn status_reports_check() {
        let game = game(
            "
            . . . . k . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . R . K .",
            Color::Black,
        );
        assert_eq!(game.status(), GameStatus::Check(Color::Black));
        assert!(!game.status().is_over());
    }

    #[test]
    fn error_messages() {
        let err = MoveError::CastlingNotAllowed {
            color: Color::White,
            side: CastleSide::Queenside,
        };
        assert_eq!(err.to_string(), "White cannot castle queenside");
        assert_eq!(
            MoveError::EmptySquare(sq("e4")).to_string(),
            "no piece on e4"
        );
    }
}

//! The interactive prompt loop.
//!
//! A [`Session`] reads commands from any [`BufRead`] and writes to any
//! [`Write`], so the same loop serves the terminal and scripted tests.

use crate::command::{Command, CommandError};
use crate::config::{CliConfig, ConfigError};
use chess_core::{Color, Piece, PieceKind, Square};
use chess_rules::{Game, GameStatus, MoveError, MoveOutcome};
use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

const HELP: &str = "\
Commands:
  e2 e4 | e2e4     move a piece
  moves e2         list the safe destinations of a piece
  O-O | O-O-O      castle kingside or queenside
  board            print the board
  captured         print captured pieces
  help             show this list
  quit             leave the game";

/// One game played at the prompt.
pub struct Session<R, W> {
    game: Game,
    input: R,
    output: W,
    unicode: bool,
    hints: bool,
    default_promotion: PieceKind,
    /// Filled by the promotion listener, drained after each move.
    promoted: Rc<Cell<Option<(Square, Color)>>>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session and registers its promotion listener on `game`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPromotion`] if the configured default
    /// promotion is unusable.
    pub fn new(
        mut game: Game,
        input: R,
        output: W,
        config: &CliConfig,
        hints: bool,
    ) -> Result<Self, ConfigError> {
        let promoted = Rc::new(Cell::new(None));
        let signal = Rc::clone(&promoted);
        game.set_promotion_listener(move |square: Square, color: Color| {
            signal.set(Some((square, color)));
        });

        Ok(Session {
            game,
            input,
            output,
            unicode: config.unicode_pieces,
            hints,
            default_promotion: config.promotion_kind()?,
            promoted,
        })
    }

    /// Ends the session and hands back the game.
    pub fn into_game(self) -> Game {
        self.game
    }

    /// Runs until checkmate, stalemate, `quit`, or end of input, and returns
    /// the status at that point.
    pub fn run(&mut self) -> io::Result<GameStatus> {
        self.print_board()?;
        if let Some(status) = self.announce()? {
            return Ok(status);
        }

        loop {
            write!(self.output, "{} to move> ", self.game.side_to_move())?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(self.game.status());
            };

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    continue;
                }
            };

            let result = match command {
                Command::Move { from, to } => self.game.apply_move(from, to),
                Command::Castle(side) => {
                    let color = self.game.side_to_move();
                    self.game.castle(color, side)
                }
                Command::Moves(square) => {
                    self.list_moves(square)?;
                    continue;
                }
                Command::Board => {
                    self.print_board()?;
                    continue;
                }
                Command::Captured => {
                    self.print_captured()?;
                    continue;
                }
                Command::Help => {
                    writeln!(self.output, "{HELP}")?;
                    continue;
                }
                Command::Quit => return Ok(self.game.status()),
            };

            match result {
                Ok(outcome) => {
                    self.report(&outcome)?;
                    if let Some((square, color)) = self.promoted.take() {
                        self.ask_promotion(square, color)?;
                    }
                    self.print_board()?;
                    if let Some(status) = self.announce()? {
                        return Ok(status);
                    }
                }
                Err(e) => self.reject(e)?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Prints check, checkmate or stalemate. Returns the status when the game is over.
    fn announce(&mut self) -> io::Result<Option<GameStatus>> {
        let status = self.game.status();
        match status {
            GameStatus::Ongoing => {}
            GameStatus::Check(color) => writeln!(self.output, "{color} is in check.")?,
            GameStatus::Checkmate(color) => {
                tracing::info!(loser = %color, "checkmate");
                writeln!(self.output, "Checkmate! {} wins.", color.opposite())?;
            }
            GameStatus::Stalemate(color) => {
                tracing::info!(%color, "stalemate");
                writeln!(self.output, "Stalemate: {color} has no legal move. Draw.")?;
            }
        }
        Ok(status.is_over().then_some(status))
    }

    fn reject(&mut self, error: MoveError) -> io::Result<()> {
        tracing::warn!(%error, "command rejected");
        writeln!(self.output, "Illegal: {error}.")
    }

    fn report(&mut self, outcome: &MoveOutcome) -> io::Result<()> {
        let color = outcome.piece.color;
        if let Some(side) = outcome.castle {
            return writeln!(self.output, "{color} castles {side}.");
        }
        match outcome.captured {
            Some(taken) => writeln!(
                self.output,
                "{} {}-{} takes {}.",
                outcome.piece, outcome.from, outcome.to, taken
            ),
            None => writeln!(
                self.output,
                "{} {}-{}.",
                outcome.piece, outcome.from, outcome.to
            ),
        }
    }

    /// Asks which piece replaces the pawn on `square` and resolves the promotion.
    fn ask_promotion(&mut self, square: Square, color: Color) -> io::Result<()> {
        let default = self.default_promotion;
        let kind = loop {
            write!(
                self.output,
                "Promote pawn on {square} to (q/r/b/n) [{}]: ",
                default.letter()
            )?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                break default;
            };
            let answer = line.trim();
            if answer.is_empty() {
                break default;
            }
            match PieceKind::from_name(answer) {
                Some(kind) if PieceKind::PROMOTION_CHOICES.contains(&kind) => break kind,
                _ => writeln!(self.output, "Choose one of q, r, b or n.")?,
            }
        };

        self.game.resolve_promotion(square, Piece::new(color, kind));
        writeln!(self.output, "Pawn on {square} promoted to {kind}.")
    }

    fn list_moves(&mut self, square: Square) -> io::Result<()> {
        if !self.hints {
            return writeln!(self.output, "Hints are disabled.");
        }
        let Some(piece) = self.game.piece_at(square) else {
            return writeln!(self.output, "No piece on {square}.");
        };
        let moves = self.game.safe_moves(square);
        if moves.is_empty() {
            return writeln!(self.output, "{piece} on {square} has no legal move.");
        }
        let names: Vec<String> = moves.iter().map(|sq| sq.to_algebraic()).collect();
        writeln!(self.output, "{piece} on {square}: {}", names.join(" "))
    }

    fn print_captured(&mut self) -> io::Result<()> {
        for color in Color::ALL {
            let pieces: Vec<String> = self
                .game
                .captured_pieces(color)
                .iter()
                .map(|piece| self.piece_symbol(*piece).to_string())
                .collect();
            let list = if pieces.is_empty() {
                "-".to_string()
            } else {
                pieces.join(" ")
            };
            writeln!(self.output, "{color} captured: {list}")?;
        }
        Ok(())
    }

    fn print_board(&mut self) -> io::Result<()> {
        let mut diagram = String::new();
        self.game
            .board()
            .render(&mut diagram, self.unicode)
            .map_err(|_| io::Error::other("failed to render board"))?;
        write!(self.output, "{diagram}")
    }

    fn piece_symbol(&self, piece: Piece) -> char {
        if self.unicode {
            piece.glyph()
        } else {
            piece.to_char()
        }
    }
}

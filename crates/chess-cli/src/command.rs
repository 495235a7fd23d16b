//! Parsing of the lines typed at the prompt.

use chess_core::{Square, SquareParseError};
use chess_rules::CastleSide;
use std::str::FromStr;
use thiserror::Error;

/// A prompt command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the piece on `from` to `to`.
    Move { from: Square, to: Square },
    /// List the destinations of the piece on a square.
    Moves(Square),
    /// Castle the side to move.
    Castle(CastleSide),
    /// Print the board.
    Board,
    /// Print both captured-piece ledgers.
    Captured,
    /// Print the command list.
    Help,
    /// Leave the game.
    Quit,
}

/// Why a line could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}', type 'help' for the list")]
    Unknown(String),
    #[error(transparent)]
    Square(#[from] SquareParseError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let words: Vec<&str> = line.split_whitespace().collect();
        let lowered = line.to_ascii_lowercase();

        match lowered.as_str() {
            "" => return Err(CommandError::Empty),
            "quit" | "exit" => return Ok(Command::Quit),
            "board" => return Ok(Command::Board),
            "captured" => return Ok(Command::Captured),
            "help" | "?" => return Ok(Command::Help),
            "o-o" | "0-0" => return Ok(Command::Castle(CastleSide::Kingside)),
            "o-o-o" | "0-0-0" => return Ok(Command::Castle(CastleSide::Queenside)),
            _ => {}
        }

        match words.as_slice() {
            ["moves", square] => Ok(Command::Moves(square.parse()?)),
            [from, to] => Ok(Command::Move {
                from: from.parse()?,
                to: to.parse()?,
            }),
            [word] => parse_joined_move(word),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

/// Parses `e2e4` or `e2-e4`.
fn parse_joined_move(word: &str) -> Result<Command, CommandError> {
    let word = word.replace('-', "");
    if word.len() != 4 || !word.is_ascii() {
        return Err(CommandError::Unknown(word));
    }
    let (from, to) = word.split_at(2);
    Ok(Command::Move {
        from: from.parse()?,
        to: to.parse()?,
    })
}

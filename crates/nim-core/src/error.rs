//! Error types for the core game rules.
//!
//! The rules are infallible for well-formed input; these errors describe
//! input a trusted client should never have sent.

use std::fmt;

/// Why a move was refused by the board or the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// Row outside `1..=4`.
    RowOutOfRange(u8),

    /// Column outside `1..=7`.
    ColumnOutOfRange(u8),

    /// The targeted cell has no stone on it.
    CellRemoved { row: u8, col: u8 },

    /// The game already has an outcome; no further moves are accepted.
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::RowOutOfRange(r) => write!(f, "row {} out of range 1..=4", r),
            MoveError::ColumnOutOfRange(c) => write!(f, "column {} out of range 1..=7", c),
            MoveError::CellRemoved { row, col } => {
                write!(f, "cell at row {}, column {} is already removed", row, col)
            }
            MoveError::GameOver => write!(f, "game is already over"),
        }
    }
}

impl std::error::Error for MoveError {}

/// A raw cell array that is not a reachable board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// A row holds a stone past its heap's starting size.
    OutsideHeap { row: u8, col: u8 },

    /// A row has a removed cell followed by an occupied one.
    Gap { row: u8 },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutsideHeap { row, col } => {
                write!(f, "row {} has a stone at column {} outside its heap", row, col)
            }
            BoardError::Gap { row } => write!(f, "row {} has a gap between stones", row),
        }
    }
}

impl std::error::Error for BoardError {}

//! nim-core
//!
//! Pure Misère Nim logic:
//! - board layout (four heaps of 1, 3, 5, 7 stones)
//! - moves and resignation
//! - seats and turn order
//! - the per-match game state machine that judges the outcome

pub mod board;
pub mod error;
pub mod game;
pub mod moves;
pub mod seat;

pub use board::{Board, Cell, BOARD_CELLS, COLS, HEAP_SIZES, ROWS};
pub use error::{BoardError, MoveError};
pub use game::{EndReason, Game, Outcome};
pub use moves::Move;
pub use seat::Seat;

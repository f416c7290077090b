//! Per-match game state machine.
//!
//! A [`Game`] owns the board, the turn counter and the resignation flag,
//! and is the single judge of whose turn it is and who lost:
//! - turns are 1-based; `Seat::First` moves on odd turns,
//! - every accepted move advances the turn,
//! - once the board is empty or the last move was a resignation, the
//!   player who made that last move loses (Misère rule).
//!
//! The match authority in `nim-server` drives this over the network; the
//! state machine itself does no I/O.

use crate::board::Board;
use crate::error::MoveError;
use crate::moves::Move;
use crate::seat::Seat;

/// Why a game ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// The loser took the last stone.
    Exhausted,

    /// The loser resigned.
    Resigned,
}

/// Final result of a game.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Seat,
    pub loser: Seat,
    pub reason: EndReason,
}

/// A single game of Misère Nim.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: u32,
    resigned: bool,
}

impl Game {
    /// New game on the canonical starting board, turn 1.
    pub fn new() -> Self {
        Game::from_board(Board::new())
    }

    /// New game starting from an arbitrary board, turn 1.
    pub fn from_board(board: Board) -> Self {
        Game {
            board,
            turn: 1,
            resigned: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current 1-based turn number.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Seat whose move it is on the current turn.
    pub fn mover(&self) -> Seat {
        Seat::for_turn(self.turn)
    }

    /// The outcome, if the game has ended.
    ///
    /// The loser is the seat that made the previous move: the one who
    /// emptied the board or resigned.
    pub fn outcome(&self) -> Option<Outcome> {
        let reason = if self.resigned {
            EndReason::Resigned
        } else if self.board.is_empty() {
            EndReason::Exhausted
        } else {
            return None;
        };

        let loser = self.mover().other();
        Some(Outcome {
            winner: loser.other(),
            loser,
            reason,
        })
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Play a move for the current mover.
    ///
    /// Resignation bypasses the board check. On success the turn advances;
    /// on error nothing changes.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        match mv {
            Move::Resign => self.resigned = true,
            Move::Take { .. } => self.board.apply(mv)?,
        }

        self.turn += 1;
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

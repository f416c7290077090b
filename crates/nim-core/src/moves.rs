//! A single player action: take stones, or resign.

/// A move as sent by a client.
///
/// `Take` carries the raw 1-based coordinates the client chose; they are
/// range-checked by [`Board::validate`](crate::Board::validate), not here,
/// so a malformed move can still be represented and reported.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    /// Remove the stone at `(row, col)` and every stone right of it.
    Take { row: u8, col: u8 },

    /// Concede the game. Encoded on the wire as `(0, 0)`.
    Resign,
}

impl Move {
    /// Convenience constructor for [`Move::Take`].
    pub fn take(row: u8, col: u8) -> Self {
        Move::Take { row, col }
    }

    /// Build a move from raw `(row, col)` values, mapping `(0, 0)` to
    /// resignation.
    pub fn from_coords(row: u8, col: u8) -> Self {
        if row == 0 && col == 0 {
            Move::Resign
        } else {
            Move::Take { row, col }
        }
    }

    /// Raw `(row, col)` values; `(0, 0)` for resignation.
    pub fn coords(self) -> (u8, u8) {
        match self {
            Move::Take { row, col } => (row, col),
            Move::Resign => (0, 0),
        }
    }

    pub fn is_resignation(self) -> bool {
        matches!(self, Move::Resign)
    }
}

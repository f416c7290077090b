//! Seat (First / Second) within a match.

/// Which side of a match a player sits on.
///
/// The first arrival (the player who was waiting) takes `First` and moves
/// on odd turns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    /// The opposing seat.
    pub fn other(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Seat that moves on a given 1-based turn.
    pub fn for_turn(turn: u32) -> Self {
        if turn % 2 == 1 {
            Seat::First
        } else {
            Seat::Second
        }
    }

    /// Player number as shown to users (`1` / `2`).
    pub fn number(self) -> u8 {
        match self {
            Seat::First => 1,
            Seat::Second => 2,
        }
    }
}

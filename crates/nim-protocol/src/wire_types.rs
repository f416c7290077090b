//! Low-level wire types and constants.
//!
//! This module defines:
//! - Message type tags for the stream protocol.
//! - Fixed frame sizes for every frame kind.
//!
//! The actual encode/decode logic lives in `binary_codec`.

use nim_core::BOARD_CELLS;

/// Width of every text field on the wire (passwords, handles).
///
/// Shorter values are null-padded; longer values are rejected.
pub const TEXT_FIELD_LEN: usize = 20;

/// Stream message frame: 1-byte tag + 20-byte payload.
pub const MESSAGE_FRAME_LEN: usize = 1 + TEXT_FIELD_LEN;

/// Stream board frame: one marker byte per cell.
pub const BOARD_FRAME_LEN: usize = BOARD_CELLS;

/// Stream move frame: row and column as ASCII digits.
pub const MOVE_FRAME_LEN: usize = 2;

/// Datagram query: the password field only.
pub const QUERY_FRAME_LEN: usize = TEXT_FIELD_LEN;

/// Fixed head of a query response: match count (u32 BE) + waiting handle.
pub const QUERY_RESPONSE_HEADER_LEN: usize = 4 + TEXT_FIELD_LEN;

/// Upper bound on the `h1:h2:` games listing in a query response.
pub const MAX_LISTING_LEN: usize = 2048;

/// Largest query response a client needs to buffer.
pub const MAX_QUERY_RESPONSE_LEN: usize = QUERY_RESPONSE_HEADER_LEN + MAX_LISTING_LEN;

/// Separator between handles in the games listing.
pub const LISTING_SEPARATOR: char = ':';

/// Stream message tags.
///
/// The tag is the first byte of every message frame.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Password submission (player → matchmaker).
    Password = b'P',

    /// Password rejected; the connection is closed afterwards
    /// (matchmaker → player).
    Rejected = b'X',

    /// Request for a display handle (matchmaker → player).
    HandleRequest = b'H',

    /// Handle submission (player → matchmaker) or handle announcement
    /// (authority → both players).
    Handle = b'R',

    /// Your move now (authority → mover).
    MoveRequest = b'A',

    /// Filler keeping the non-mover in lock-step (authority → non-mover).
    Filler = b'Z',

    /// You won (authority → winner).
    Win = b'W',

    /// You lost (authority → loser).
    Loss = b'L',
}

impl MessageType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            b'P' => Some(MessageType::Password),
            b'X' => Some(MessageType::Rejected),
            b'H' => Some(MessageType::HandleRequest),
            b'R' => Some(MessageType::Handle),
            b'A' => Some(MessageType::MoveRequest),
            b'Z' => Some(MessageType::Filler),
            b'W' => Some(MessageType::Win),
            b'L' => Some(MessageType::Loss),
            _ => None,
        }
    }

    /// The tag as a printable character, for logs.
    pub fn as_char(self) -> char {
        self as u8 as char
    }
}

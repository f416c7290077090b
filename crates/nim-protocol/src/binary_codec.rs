//! Binary encoding/decoding for Nim protocol frames.
//!
//! Every stream frame has a fixed size, so a reader always knows exactly
//! how many bytes to wait for:
//!
//! ```text
//! Message (stream, 21 bytes)
//! --------------------------
//! [0]     : tag (MessageType as u8: P X H R A Z W L)
//! [1..21] : payload, UTF-8, null-padded (password or handle)
//!
//! Board (stream, 28 bytes)
//! ------------------------
//! [0..28] : one marker per cell, row-major; 'O' = occupied, 'X' = removed
//!
//! Move (stream, 2 bytes)
//! ----------------------
//! [0]     : row as ASCII digit    ('1'..'4', '0' for resignation)
//! [1]     : column as ASCII digit ('1'..'7', '0' for resignation)
//!
//! Query (datagram, 20 bytes)
//! --------------------------
//! [0..20] : password, null-padded (all zero when no password)
//!
//! QueryResponse (datagram, 24 + n bytes)
//! --------------------------------------
//! [0..4]  : matches in progress (u32 BE)
//! [4..24] : waiting handle, null-padded (all zero when nobody waits)
//! [24..]  : games listing "h1:h2:h1:h2:...", at most MAX_LISTING_LEN bytes
//! ```
//!
//! Text fields are never silently truncated: encoding a value longer than
//! the field is an error.

use std::fmt;

use bytes::{Buf, BufMut};
use nim_core::{Board, Cell, Move, BOARD_CELLS};

use crate::messages::{Message, Query, QueryResponse};
use crate::wire_types::{
    MessageType, BOARD_FRAME_LEN, MAX_LISTING_LEN, MESSAGE_FRAME_LEN, MOVE_FRAME_LEN,
    QUERY_FRAME_LEN, QUERY_RESPONSE_HEADER_LEN, TEXT_FIELD_LEN,
};

/// Errors that can arise when encoding/decoding a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer too short for the frame.
    Truncated { expected: usize, actual: usize },
    /// Unknown message tag.
    UnknownMessageType(u8),
    /// A text value does not fit its fixed-width field.
    FieldTooLong { field: &'static str, len: usize },
    /// A text field is not valid UTF-8.
    InvalidUtf8(&'static str),
    /// Any other malformed field (bad board marker, non-digit move, ...).
    InvalidField(&'static str),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Truncated { expected, actual } => {
                write!(f, "Frame truncated: expected {} bytes, got {}", expected, actual)
            }
            ProtocolError::UnknownMessageType(t) => write!(f, "Unknown message type: {:#04x}", t),
            ProtocolError::FieldTooLong { field, len } => write!(
                f,
                "Field {} is {} bytes, limit is {}",
                field, len, TEXT_FIELD_LEN
            ),
            ProtocolError::InvalidUtf8(field) => write!(f, "Field {} is not valid UTF-8", field),
            ProtocolError::InvalidField(field) => write!(f, "Invalid field: {}", field),
        }
    }
}

impl std::error::Error for ProtocolError {}

// ============================================================================
// Stream frames
// ============================================================================

/// Encode a message into its 21-byte frame.
pub fn encode_message(msg: &Message) -> Result<[u8; MESSAGE_FRAME_LEN], ProtocolError> {
    let mut frame = [0u8; MESSAGE_FRAME_LEN];
    frame[0] = msg.kind as u8;
    write_text_field("payload", &msg.payload, &mut frame[1..])?;
    Ok(frame)
}

/// Decode a message frame.
pub fn decode_message(buf: &[u8]) -> Result<Message, ProtocolError> {
    check_len(buf, MESSAGE_FRAME_LEN)?;

    let tag = buf[0];
    let kind = MessageType::from_u8(tag).ok_or(ProtocolError::UnknownMessageType(tag))?;
    let payload = read_text_field("payload", &buf[1..MESSAGE_FRAME_LEN])?;

    Ok(Message { kind, payload })
}

/// Encode a board into its 28-byte frame.
pub fn encode_board(board: &Board) -> [u8; BOARD_FRAME_LEN] {
    let mut frame = [0u8; BOARD_FRAME_LEN];
    for (byte, cell) in frame.iter_mut().zip(board.cells().iter()) {
        *byte = cell.as_byte();
    }
    frame
}

/// Decode a board frame, rejecting unknown markers and unreachable layouts.
pub fn decode_board(buf: &[u8]) -> Result<Board, ProtocolError> {
    check_len(buf, BOARD_FRAME_LEN)?;

    let mut cells = [Cell::Removed; BOARD_CELLS];
    for (cell, &byte) in cells.iter_mut().zip(buf.iter()) {
        *cell = Cell::from_byte(byte).ok_or(ProtocolError::InvalidField("board cell"))?;
    }

    Board::from_cells(cells).map_err(|_| ProtocolError::InvalidField("board layout"))
}

/// Encode a move into its 2-byte frame.
///
/// Coordinates must be single decimal digits; range against the board is
/// not checked here.
pub fn encode_move(mv: Move) -> Result<[u8; MOVE_FRAME_LEN], ProtocolError> {
    let (row, col) = mv.coords();
    if row > 9 || col > 9 {
        return Err(ProtocolError::InvalidField("move digit"));
    }
    Ok([b'0' + row, b'0' + col])
}

/// Decode a move frame. `"00"` is resignation.
pub fn decode_move(buf: &[u8]) -> Result<Move, ProtocolError> {
    check_len(buf, MOVE_FRAME_LEN)?;

    let row = read_digit(buf[0])?;
    let col = read_digit(buf[1])?;

    Ok(Move::from_coords(row, col))
}

// ============================================================================
// Datagrams
// ============================================================================

/// Encode a query into its 20-byte datagram.
pub fn encode_query(query: &Query) -> Result<[u8; QUERY_FRAME_LEN], ProtocolError> {
    let mut frame = [0u8; QUERY_FRAME_LEN];
    write_text_field("password", &query.password, &mut frame)?;
    Ok(frame)
}

/// Decode a query datagram. Extra trailing bytes are ignored.
pub fn decode_query(buf: &[u8]) -> Result<Query, ProtocolError> {
    check_len(buf, QUERY_FRAME_LEN)?;

    let password = read_text_field("password", &buf[..QUERY_FRAME_LEN])?;
    Ok(Query { password })
}

/// Encode a query response.
///
/// The encoded bytes are appended to `out`.
pub fn encode_query_response(resp: &QueryResponse, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    if resp.games.len() > MAX_LISTING_LEN {
        return Err(ProtocolError::FieldTooLong {
            field: "games",
            len: resp.games.len(),
        });
    }

    let mut waiting = [0u8; TEXT_FIELD_LEN];
    write_text_field("waiting", &resp.waiting, &mut waiting)?;

    out.reserve(QUERY_RESPONSE_HEADER_LEN + resp.games.len());
    out.put_u32(resp.in_progress);
    out.put_slice(&waiting);
    out.put_slice(resp.games.as_bytes());

    Ok(())
}

/// Decode a query response datagram.
pub fn decode_query_response(buf: &[u8]) -> Result<QueryResponse, ProtocolError> {
    check_len(buf, QUERY_RESPONSE_HEADER_LEN)?;

    let mut cursor = buf;
    let in_progress = cursor.get_u32();
    let waiting = read_text_field("waiting", &cursor[..TEXT_FIELD_LEN])?;
    cursor.advance(TEXT_FIELD_LEN);

    let games = read_text_field("games", cursor)?;
    if games.len() > MAX_LISTING_LEN {
        return Err(ProtocolError::FieldTooLong {
            field: "games",
            len: games.len(),
        });
    }

    Ok(QueryResponse {
        in_progress,
        waiting,
        games,
    })
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn check_len(buf: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if buf.len() < expected {
        return Err(ProtocolError::Truncated {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Copy `value` into a zeroed fixed-width field.
fn write_text_field(field: &'static str, value: &str, out: &mut [u8]) -> Result<(), ProtocolError> {
    let bytes = value.as_bytes();
    if bytes.len() > out.len() {
        return Err(ProtocolError::FieldTooLong {
            field,
            len: bytes.len(),
        });
    }
    if bytes.contains(&0) {
        return Err(ProtocolError::InvalidField(field));
    }
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(())
}

/// Read a null-padded text field; the value ends at the first NUL.
fn read_text_field(field: &'static str, bytes: &[u8]) -> Result<String, ProtocolError> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end])
        .map(str::to_string)
        .map_err(|_| ProtocolError::InvalidUtf8(field))
}

fn read_digit(byte: u8) -> Result<u8, ProtocolError> {
    if byte.is_ascii_digit() {
        Ok(byte - b'0')
    } else {
        Err(ProtocolError::InvalidField("move digit"))
    }
}

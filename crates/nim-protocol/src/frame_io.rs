//! Reliable whole-frame I/O over a byte stream.
//!
//! Every frame has a fixed size, so sending is `write_all` + `flush` and
//! receiving is `read_exact`: both loop until the full frame has moved or
//! the connection fails. A caller never observes a short frame; a peer
//! that closes mid-frame surfaces as `FrameError::Io(UnexpectedEof)`.

use std::fmt;
use std::io;

use nim_core::{Board, Move};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::binary_codec::{
    decode_board, decode_message, decode_move, encode_board, encode_message, encode_move,
    ProtocolError,
};
use crate::messages::Message;
use crate::wire_types::{BOARD_FRAME_LEN, MESSAGE_FRAME_LEN, MOVE_FRAME_LEN};

/// Failure to move one frame across a stream.
#[derive(Debug)]
pub enum FrameError {
    /// The transport failed (reset, closed, short read/write).
    Io(io::Error),
    /// The bytes arrived but do not form a valid frame, or a value could
    /// not be encoded.
    Protocol(ProtocolError),
}

impl FrameError {
    /// True when the peer closed the connection cleanly mid-frame or
    /// before one.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, FrameError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Io(e) => write!(f, "transport error: {}", e),
            FrameError::Protocol(e) => write!(f, "protocol error: {}", e),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io(e) => Some(e),
            FrameError::Protocol(e) => Some(e),
        }
    }
}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        FrameError::Io(e)
    }
}

impl From<ProtocolError> for FrameError {
    fn from(e: ProtocolError) -> Self {
        FrameError::Protocol(e)
    }
}

/// A stream that speaks whole Nim frames.
///
/// Owning a `FrameStream` means owning the connection: moving it moves
/// the connection, dropping it closes the connection.
#[derive(Debug)]
pub struct FrameStream<S> {
    stream: S,
}

impl<S> FrameStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        FrameStream { stream }
    }

    pub async fn send_message(&mut self, msg: &Message) -> Result<(), FrameError> {
        let frame = encode_message(msg)?;
        self.write_frame(&frame).await
    }

    pub async fn recv_message(&mut self) -> Result<Message, FrameError> {
        let mut frame = [0u8; MESSAGE_FRAME_LEN];
        self.stream.read_exact(&mut frame).await?;
        Ok(decode_message(&frame)?)
    }

    pub async fn send_board(&mut self, board: &Board) -> Result<(), FrameError> {
        let frame = encode_board(board);
        self.write_frame(&frame).await
    }

    pub async fn recv_board(&mut self) -> Result<Board, FrameError> {
        let mut frame = [0u8; BOARD_FRAME_LEN];
        self.stream.read_exact(&mut frame).await?;
        Ok(decode_board(&frame)?)
    }

    pub async fn send_move(&mut self, mv: Move) -> Result<(), FrameError> {
        let frame = encode_move(mv)?;
        self.write_frame(&frame).await
    }

    pub async fn recv_move(&mut self) -> Result<Move, FrameError> {
        let mut frame = [0u8; MOVE_FRAME_LEN];
        self.stream.read_exact(&mut frame).await?;
        Ok(decode_move(&frame)?)
    }

    /// Flush and shut down the write side.
    pub async fn shutdown(&mut self) -> Result<(), FrameError> {
        self.stream.shutdown().await?;
        Ok(())
    }

    async fn write_frame(&mut self, frame: &[u8]) -> Result<(), FrameError> {
        self.stream.write_all(frame).await?;
        self.stream.flush().await?;
        Ok(())
    }
}

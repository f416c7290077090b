//! Player side of a play connection.
//!
//! ```text
//! connect → authenticate (P, expect H) → submit_handle (R)
//!         → await_match (R first, R second) → play
//! ```
//!
//! During `play` each turn starts with a board frame followed by one
//! message: `A` asks for a move, `Z` means the opponent is moving, and
//! `W` / `L` end the match.

use nim_core::{Board, Move, MoveError, Seat};
use nim_protocol::wire_types::TEXT_FIELD_LEN;
use nim_protocol::{FrameStream, Message, MessageType};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::error::ClientError;

/// Who is playing, as announced by the match authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub first: String,
    pub second: String,

    /// Our seat, found by comparing our handle with the announcement.
    /// When both players chose the same handle this reads `First` for both.
    pub seat: Seat,
}

impl MatchInfo {
    pub fn opponent(&self) -> &str {
        match self.seat {
            Seat::First => &self.second,
            Seat::Second => &self.first,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Won,
    Lost,
}

/// Decision-making half of a client.
///
/// Only [`Player::choose_move`] is required; the other hooks are for
/// display.
pub trait Player {
    fn on_match_start(&mut self, _info: &MatchInfo) {}

    fn on_board(&mut self, _board: &Board) {}

    /// Pick a move for `board`. Returning [`Move::Resign`] concedes.
    fn choose_move(&mut self, board: &Board) -> Move;

    /// Called when the last choice was not legal; `choose_move` is then
    /// asked again.
    fn on_invalid_move(&mut self, _mv: Move, _err: &MoveError) {}

    fn on_waiting(&mut self) {}
}

/// Check a handle before sending it.
pub fn check_handle(handle: &str) -> Result<(), ClientError> {
    if handle.is_empty() {
        return Err(ClientError::Argument("handle must not be empty".to_string()));
    }
    if handle.len() > TEXT_FIELD_LEN {
        return Err(ClientError::Argument(format!(
            "handle is {} bytes, at most {} allowed",
            handle.len(),
            TEXT_FIELD_LEN
        )));
    }
    if handle.contains(':') || handle.contains('\0') {
        return Err(ClientError::Argument("handle must not contain ':' or NUL".to_string()));
    }
    Ok(())
}

/// One play connection.
#[derive(Debug)]
pub struct PlaySession<S> {
    stream: FrameStream<S>,
    handle: Option<String>,
}

impl PlaySession<TcpStream> {
    /// Open a play connection to `addr` (`host:port`).
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await.map_err(|source| ClientError::Connect {
            addr: addr.to_string(),
            source,
        })?;
        stream.set_nodelay(true).map_err(|source| ClientError::Connect {
            addr: addr.to_string(),
            source,
        })?;
        info!(%addr, "connected to play port");
        Ok(PlaySession::new(stream))
    }
}

impl<S> PlaySession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        PlaySession {
            stream: FrameStream::new(stream),
            handle: None,
        }
    }

    /// Send the password (empty when none) and wait for the handle request.
    pub async fn authenticate(&mut self, password: &str) -> Result<(), ClientError> {
        self.stream
            .send_message(&Message::password(password))
            .await
            .map_err(ClientError::PlayRequest)?;

        let reply = self.stream.recv_message().await.map_err(ClientError::PlayRequest)?;
        match reply.kind {
            MessageType::HandleRequest => Ok(()),
            MessageType::Rejected => Err(ClientError::Rejected),
            other => Err(ClientError::UnexpectedReply(other)),
        }
    }

    pub async fn submit_handle(&mut self, handle: &str) -> Result<(), ClientError> {
        check_handle(handle)?;
        self.stream
            .send_message(&Message::handle(handle))
            .await
            .map_err(ClientError::PlayRequest)?;
        self.handle = Some(handle.to_string());
        debug!(%handle, "handle submitted");
        Ok(())
    }

    /// Wait for an opponent. Returns once both handles are announced.
    pub async fn await_match(&mut self) -> Result<MatchInfo, ClientError> {
        let first = self.recv_announcement().await?;
        let second = self.recv_announcement().await?;
        let seat = if self.handle.as_deref() == Some(first.as_str()) {
            Seat::First
        } else {
            Seat::Second
        };
        Ok(MatchInfo { first, second, seat })
    }

    /// Play until the authority declares a result.
    ///
    /// Moves are checked locally against the last board, so only legal
    /// moves reach the server.
    pub async fn play<P: Player>(&mut self, player: &mut P) -> Result<GameResult, ClientError> {
        loop {
            let board = self.stream.recv_board().await.map_err(ClientError::Match)?;
            player.on_board(&board);

            let msg = self.stream.recv_message().await.map_err(ClientError::Match)?;
            match msg.kind {
                MessageType::Win => return Ok(GameResult::Won),
                MessageType::Loss => return Ok(GameResult::Lost),
                MessageType::Filler => player.on_waiting(),
                MessageType::MoveRequest => {
                    let mv = choose_legal(&board, player);
                    self.stream.send_move(mv).await.map_err(ClientError::Match)?;
                    debug!(?mv, "move sent");
                }
                other => return Err(ClientError::UnexpectedFrame(other)),
            }
        }
    }

    async fn recv_announcement(&mut self) -> Result<String, ClientError> {
        let msg = self.stream.recv_message().await.map_err(ClientError::Match)?;
        if msg.kind != MessageType::Handle {
            return Err(ClientError::UnexpectedFrame(msg.kind));
        }
        Ok(msg.payload)
    }
}

fn choose_legal<P: Player>(board: &Board, player: &mut P) -> Move {
    loop {
        let mv = player.choose_move(board);
        match board.validate(mv) {
            Ok(()) => return mv,
            Err(e) => player.on_invalid_move(mv, &e),
        }
    }
}

//! Per-connection authentication.
//!
//! Drives a freshly accepted connection through
//! `AUTH_PENDING → HANDLE_PENDING` and hands back either an authenticated
//! [`Session`] or a rejection:
//!
//! ```text
//! player                    matchmaker
//!   | --- P <password> ------> |
//!   | <------------ X -------- |   wrong password: connection closed
//!   | <------------ H -------- |   otherwise: handle requested
//!   | --- R <handle> --------> |
//! ```
//!
//! This runs inline in the dispatch loop, so a slow client delays other
//! arrivals; the optional timeout bounds that.

use std::net::SocketAddr;
use std::time::Duration;

use nim_protocol::wire_types::LISTING_SEPARATOR;
use nim_protocol::{FrameError, FrameStream, Message, MessageType};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::types::Session;

/// Why a connection was discarded during authentication.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    Frame(#[from] FrameError),

    #[error("expected {expected:?} frame, got {actual:?}")]
    UnexpectedMessage {
        expected: MessageType,
        actual: MessageType,
    },

    #[error("client submitted an empty handle")]
    EmptyHandle,

    #[error("handle {0:?} contains the listing separator")]
    InvalidHandle(String),

    #[error("authentication did not complete within {0:?}")]
    TimedOut(Duration),
}

/// Result of a completed authentication exchange.
#[derive(Debug)]
pub enum AuthOutcome<S> {
    /// Password accepted and handle received.
    Accepted(Session<S>),

    /// Wrong password; the client was told (`X`) and the connection closed.
    Rejected,
}

/// Authenticate a new connection, optionally bounded by `timeout`.
pub async fn authenticate<S>(
    stream: S,
    peer: Option<SocketAddr>,
    password: Option<&str>,
    timeout: Option<Duration>,
) -> Result<AuthOutcome<S>, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let exchange = exchange(FrameStream::new(stream), peer, password);
    match timeout {
        Some(limit) => tokio::time::timeout(limit, exchange)
            .await
            .map_err(|_| SessionError::TimedOut(limit))?,
        None => exchange.await,
    }
}

async fn exchange<S>(
    mut stream: FrameStream<S>,
    peer: Option<SocketAddr>,
    password: Option<&str>,
) -> Result<AuthOutcome<S>, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let submitted = expect(&mut stream, MessageType::Password).await?;

    if let Some(expected) = password {
        if submitted.payload != expected {
            debug!(?peer, "password rejected");
            stream.send_message(&Message::rejected()).await?;
            // Best effort: the client may already be gone.
            let _ = stream.shutdown().await;
            return Ok(AuthOutcome::Rejected);
        }
    }

    stream.send_message(&Message::handle_request()).await?;
    let handle = expect(&mut stream, MessageType::Handle).await?.payload;
    if handle.is_empty() {
        return Err(SessionError::EmptyHandle);
    }
    if handle.contains(LISTING_SEPARATOR) {
        return Err(SessionError::InvalidHandle(handle));
    }

    debug!(?peer, %handle, "session authenticated");
    Ok(AuthOutcome::Accepted(Session::new(handle, peer, stream)))
}

async fn expect<S>(stream: &mut FrameStream<S>, expected: MessageType) -> Result<Message, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let msg = stream.recv_message().await?;
    if msg.kind != expected {
        return Err(SessionError::UnexpectedMessage {
            expected,
            actual: msg.kind,
        });
    }
    Ok(msg)
}

//! Shared types for the Nim server.
//!
//! This module defines:
//! - `MatchId`: a lightweight handle for a running match
//! - `Session`: an authenticated player connection awaiting pairing
//! - `MatchRecord`: the matchmaker's bookkeeping for one running match
//! - `Census`: the read-only view handed to the directory service

use std::fmt;
use std::net::SocketAddr;

use nim_protocol::FrameStream;
use tokio::task::JoinHandle;

/// Identifier for a match.
///
/// Unique over the lifetime of the matchmaker that assigned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An authenticated, handle-bound connection.
///
/// Whoever holds the `Session` owns the connection.
#[derive(Debug)]
pub struct Session<S> {
    pub handle: String,
    pub peer: Option<SocketAddr>,
    pub stream: FrameStream<S>,
}

impl<S> Session<S> {
    pub fn new(handle: impl Into<String>, peer: Option<SocketAddr>, stream: FrameStream<S>) -> Self {
        Session {
            handle: handle.into(),
            peer,
            stream,
        }
    }
}

/// A match in progress, as the matchmaker sees it.
///
/// Holds no connection: both live streams were moved into the authority
/// task. The join handle is only ever probed, never awaited, while the
/// matchmaker is running.
#[derive(Debug)]
pub struct MatchRecord {
    pub first: String,
    pub second: String,
    pub authority: JoinHandle<()>,
}

impl MatchRecord {
    /// True once the match authority has exited (normally or not).
    pub fn is_finished(&self) -> bool {
        self.authority.is_finished()
    }
}

/// Snapshot of the matchmaker state answered by the directory service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Census {
    /// Handle of the parked player, if any.
    pub waiting: Option<String>,

    /// `(first, second)` handles of every match in progress, in pairing
    /// order.
    pub pairings: Vec<(String, String)>,
}

impl Census {
    pub fn in_progress(&self) -> usize {
        self.pairings.len()
    }
}

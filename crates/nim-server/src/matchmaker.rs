//! Matchmaker state: the waiting slot and the roster of running matches.
//!
//! A single `Matchmaker` value is owned by the dispatch loop in
//! [`crate::server`]; nothing else can reach it, so it needs no locking.
//!
//! - [`Matchmaker::admit`] parks a session or pairs it with the parked one.
//!   Pairing moves both connections into a new match authority task; the
//!   matchmaker keeps only the handles and the task's join handle.
//! - [`Matchmaker::sweep`] drops roster entries whose authority has exited.
//! - [`Matchmaker::census`] is the read-only view for the directory service.

use indexmap::IndexMap;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::match_task;
use crate::types::{Census, MatchId, MatchRecord, Session};

/// What happened to an admitted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The session now occupies the waiting slot.
    Parked,

    /// The session was paired with the parked one and a match started.
    Paired(MatchId),
}

/// Waiting slot + roster.
#[derive(Debug)]
pub struct Matchmaker<S> {
    waiting: Option<Session<S>>,
    roster: IndexMap<MatchId, MatchRecord>,
    next_match_id: u64,
}

impl<S> Default for Matchmaker<S> {
    fn default() -> Self {
        Matchmaker {
            waiting: None,
            roster: IndexMap::new(),
            next_match_id: 1,
        }
    }
}

impl<S> Matchmaker<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    pub fn new() -> Self {
        Matchmaker::default()
    }

    /// Park `session`, or pair it with the parked session.
    ///
    /// The parked session becomes player 1. Must be called from within a
    /// tokio runtime, since pairing spawns the match authority.
    pub fn admit(&mut self, session: Session<S>) -> Admission {
        let Some(first) = self.waiting.take() else {
            info!(handle = %session.handle, peer = ?session.peer, "player parked in waiting slot");
            self.waiting = Some(session);
            return Admission::Parked;
        };

        let id = MatchId(self.next_match_id);
        self.next_match_id += 1;

        let record = MatchRecord {
            first: first.handle.clone(),
            second: session.handle.clone(),
            authority: match_task::spawn(id, first, session),
        };
        info!(match_id = %id, first = %record.first, second = %record.second, "match started");

        self.roster.insert(id, record);
        Admission::Paired(id)
    }
}

impl<S> Matchmaker<S> {
    /// Remove every match whose authority has exited.
    ///
    /// Never blocks. Returns the number of records removed; a sweep with
    /// nothing newly finished leaves the roster untouched.
    pub fn sweep(&mut self) -> usize {
        let before = self.roster.len();
        self.roster.retain(|id, record| {
            let done = record.is_finished();
            if done {
                debug!(match_id = %id, "match retired from roster");
            }
            !done
        });
        before - self.roster.len()
    }

    /// Matches currently in the roster.
    pub fn in_progress(&self) -> usize {
        self.roster.len()
    }

    /// Handle of the parked player, if any.
    pub fn waiting_handle(&self) -> Option<&str> {
        self.waiting.as_ref().map(|s| s.handle.as_str())
    }

    /// Snapshot for the directory service.
    pub fn census(&self) -> Census {
        Census {
            waiting: self.waiting_handle().map(str::to_string),
            pairings: self
                .roster
                .values()
                .map(|r| (r.first.clone(), r.second.clone()))
                .collect(),
        }
    }

    /// Tear down for shutdown: close the parked connection, if any, and
    /// hand back the join handles of the matches still running.
    pub fn into_running(mut self) -> Vec<JoinHandle<()>> {
        if let Some(parked) = self.waiting.take() {
            info!(handle = %parked.handle, "closing parked session");
        }
        self.roster.into_values().map(|r| r.authority).collect()
    }
}

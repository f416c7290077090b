//! Logical frames exchanged between players, the matchmaker, the match
//! authority and the directory service.
//!
//! These are plain values; `binary_codec` turns them into fixed-size
//! frames.

use crate::wire_types::{MessageType, LISTING_SEPARATOR};

/// A stream message: a type tag plus a short text payload.
///
/// The payload carries a password (`P`) or a handle (`R`) and is empty
/// for every other tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageType,
    pub payload: String,
}

impl Message {
    pub fn new(kind: MessageType, payload: impl Into<String>) -> Self {
        Message {
            kind,
            payload: payload.into(),
        }
    }

    fn bare(kind: MessageType) -> Self {
        Message::new(kind, String::new())
    }

    pub fn password(password: impl Into<String>) -> Self {
        Message::new(MessageType::Password, password)
    }

    pub fn rejected() -> Self {
        Message::bare(MessageType::Rejected)
    }

    pub fn handle_request() -> Self {
        Message::bare(MessageType::HandleRequest)
    }

    pub fn handle(handle: impl Into<String>) -> Self {
        Message::new(MessageType::Handle, handle)
    }

    pub fn move_request() -> Self {
        Message::bare(MessageType::MoveRequest)
    }

    pub fn filler() -> Self {
        Message::bare(MessageType::Filler)
    }

    pub fn win() -> Self {
        Message::bare(MessageType::Win)
    }

    pub fn loss() -> Self {
        Message::bare(MessageType::Loss)
    }
}

/// Directory query datagram.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Empty when the client has no password.
    pub password: String,
}

impl Query {
    pub fn new(password: impl Into<String>) -> Self {
        Query {
            password: password.into(),
        }
    }
}

/// Directory query reply: the match census at the moment of the query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResponse {
    /// Number of matches in progress.
    pub in_progress: u32,

    /// Handle of the parked player, empty when nobody is waiting.
    pub waiting: String,

    /// `h1:h2:` for every match in progress, concatenated.
    pub games: String,
}

impl QueryResponse {
    /// Build a response from the in-progress pairings.
    ///
    /// The count is always the full number of pairings; the listing is
    /// built from the same pairs.
    pub fn from_pairings<'a, I>(in_progress: u32, waiting: &str, pairings: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut games = String::new();
        for (first, second) in pairings {
            push_pairing(&mut games, first, second);
        }
        QueryResponse {
            in_progress,
            waiting: waiting.to_string(),
            games,
        }
    }

    /// The waiting handle, if anyone is waiting.
    pub fn waiting(&self) -> Option<&str> {
        if self.waiting.is_empty() {
            None
        } else {
            Some(&self.waiting)
        }
    }

    /// Split the listing back into `(first, second)` pairs.
    ///
    /// A trailing unpaired handle (which a well-formed listing never has)
    /// is ignored.
    pub fn pairings(&self) -> Vec<(String, String)> {
        let handles: Vec<&str> = self
            .games
            .split(LISTING_SEPARATOR)
            .filter(|h| !h.is_empty())
            .collect();
        handles
            .chunks_exact(2)
            .map(|pair| (pair[0].to_string(), pair[1].to_string()))
            .collect()
    }
}

/// Append `first:second:` to a games listing.
pub fn push_pairing(listing: &mut String, first: &str, second: &str) {
    listing.push_str(first);
    listing.push(LISTING_SEPARATOR);
    listing.push_str(second);
    listing.push(LISTING_SEPARATOR);
}

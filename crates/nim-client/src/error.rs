//! Client error categories.
//!
//! Each variant maps to one process exit status of the `nim` binary, see
//! [`ClientError::exit_code`].

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use nim_protocol::{FrameError, MessageType};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("argument error: {0}")]
    Argument(String),

    #[error("unable to access server address file {}: {reason}", .path.display())]
    AddressFile { path: PathBuf, reason: String },

    #[error("problem querying server: {0}")]
    Query(#[source] io::Error),

    #[error("no query response from server within {0:?}")]
    QueryTimeout(Duration),

    #[error("problem requesting to play: {0}")]
    PlayRequest(#[source] FrameError),

    #[error("could not connect to play port {addr}: {source}")]
    Connect { addr: String, source: io::Error },

    #[error("password rejected by server")]
    Rejected,

    #[error("unexpected {0:?} reply to play request")]
    UnexpectedReply(MessageType),

    #[error("unexpected {0:?} frame during match")]
    UnexpectedFrame(MessageType),

    #[error("problem communicating with match server: {0}")]
    Match(#[source] FrameError),
}

impl ClientError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::Argument(_) => 1,
            ClientError::AddressFile { .. } => 2,
            ClientError::Query(_) => 3,
            ClientError::QueryTimeout(_) => 4,
            ClientError::PlayRequest(_)
            | ClientError::Connect { .. }
            | ClientError::Rejected
            | ClientError::UnexpectedReply(_) => 5,
            ClientError::UnexpectedFrame(_) | ClientError::Match(_) => 6,
        }
    }
}

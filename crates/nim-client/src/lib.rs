//! nim-client
//!
//! Player side of the Nim matchmaking protocol: address-file bootstrap,
//! directory queries and a play session driven by a [`Player`].

pub mod bootstrap;
pub mod error;
pub mod query;
pub mod session;

pub use error::ClientError;
pub use query::{query_server, render_census};
pub use session::{check_handle, GameResult, MatchInfo, PlaySession, Player};

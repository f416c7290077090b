//! nim-server
//!
//! Matchmaking server for networked Misère Nim: a UDP directory service,
//! a matchmaker that pairs authenticated players, and one match authority
//! task per game.

pub mod addr_file;
pub mod config;
pub mod directory;
pub mod match_task;
pub mod matchmaker;
pub mod server;
pub mod session;
pub mod types;

pub use config::Config;
pub use server::Server;

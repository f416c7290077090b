//! Bootstrap address record.
//!
//! The server writes a single line `hostname:query_port:play_port` to a
//! well-known file; clients read it to find both endpoints.

use std::fmt;
use std::str::FromStr;

/// Where to reach a running server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapRecord {
    pub host: String,
    pub query_port: u16,
    pub play_port: u16,
}

impl BootstrapRecord {
    pub fn new(host: impl Into<String>, query_port: u16, play_port: u16) -> Self {
        BootstrapRecord {
            host: host.into(),
            query_port,
            play_port,
        }
    }

    /// `host:query_port`, suitable for `lookup_host` / `UdpSocket::connect`.
    pub fn query_addr(&self) -> String {
        format!("{}:{}", self.host, self.query_port)
    }

    /// `host:play_port`, suitable for `TcpStream::connect`.
    pub fn play_addr(&self) -> String {
        format!("{}:{}", self.host, self.play_port)
    }
}

impl fmt::Display for BootstrapRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.host, self.query_port, self.play_port)
    }
}

/// A bootstrap line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    /// Fewer than three `:`-separated fields, or an empty host.
    MissingField(&'static str),
    /// A port is not a valid `u16`.
    InvalidPort(String),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::MissingField(field) => write!(f, "missing {} in address record", field),
            BootstrapError::InvalidPort(p) => write!(f, "invalid port {:?} in address record", p),
        }
    }
}

impl std::error::Error for BootstrapError {}

impl FromStr for BootstrapRecord {
    type Err = BootstrapError;

    /// Parse the last non-empty line of the record.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .ok_or(BootstrapError::MissingField("host"))?;

        // Split from the right so the two ports are always the last fields.
        let mut parts = line.rsplitn(3, ':');
        let play = parts.next().ok_or(BootstrapError::MissingField("play port"))?;
        let query = parts.next().ok_or(BootstrapError::MissingField("query port"))?;
        let host = parts
            .next()
            .filter(|h| !h.is_empty())
            .ok_or(BootstrapError::MissingField("host"))?;

        Ok(BootstrapRecord {
            host: host.to_string(),
            query_port: parse_port(query)?,
            play_port: parse_port(play)?,
        })
    }
}

fn parse_port(s: &str) -> Result<u16, BootstrapError> {
    s.trim()
        .parse::<u16>()
        .map_err(|_| BootstrapError::InvalidPort(s.to_string()))
}

//! One-shot directory query over UDP.

use std::fmt::Write as _;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use nim_protocol::wire_types::MAX_QUERY_RESPONSE_LEN;
use nim_protocol::{decode_query_response, encode_query, Query, QueryResponse};
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

use crate::error::ClientError;

/// How long to wait for the directory to answer.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(60);

/// Send one query to `addr` and wait up to `timeout` for the reply.
///
/// A server with a different password never answers, so a wrong password
/// surfaces as [`ClientError::QueryTimeout`].
pub async fn query_server(addr: &str, password: &str, timeout: Duration) -> Result<QueryResponse, ClientError> {
    let query = encode_query(&Query::new(password)).map_err(|e| ClientError::Argument(e.to_string()))?;

    let dest = lookup_host(addr)
        .await
        .map_err(ClientError::Query)?
        .next()
        .ok_or_else(|| ClientError::Query(io::Error::new(io::ErrorKind::NotFound, format!("no address for {}", addr))))?;
    let local: SocketAddr = if dest.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(local).await.map_err(ClientError::Query)?;
    socket.connect(dest).await.map_err(ClientError::Query)?;
    socket.send(&query).await.map_err(ClientError::Query)?;
    debug!(%dest, "query sent");

    let mut buf = vec![0u8; MAX_QUERY_RESPONSE_LEN];
    let n = tokio::time::timeout(timeout, socket.recv(&mut buf))
        .await
        .map_err(|_| ClientError::QueryTimeout(timeout))?
        .map_err(ClientError::Query)?;

    decode_query_response(&buf[..n]).map_err(|e| ClientError::Query(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Human-readable census, one line per fact.
///
/// ```text
/// > There is 1 game in progress
///                alice vs. bob
/// > carol is waiting to play
/// ```
pub fn render_census(resp: &QueryResponse) -> String {
    let mut out = String::new();
    if resp.in_progress == 1 {
        let _ = writeln!(out, "> There is 1 game in progress");
    } else {
        let _ = writeln!(out, "> There are {} games in progress", resp.in_progress);
    }
    for (first, second) in resp.pairings() {
        let _ = writeln!(out, "{:>20} vs. {}", first, second);
    }
    if let Some(waiting) = resp.waiting() {
        let _ = writeln!(out, "> {} is waiting to play", waiting);
    }
    out
}

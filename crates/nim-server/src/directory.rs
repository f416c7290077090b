//! Directory service: answers census queries over UDP.
//!
//! Each datagram is handled on its own; nothing is remembered between
//! queries. Policy:
//! - wrong password (when one is configured): no reply at all, so a
//!   prober learns nothing;
//! - otherwise: reply with a response built fresh from the census.

use std::io;
use std::net::SocketAddr;

use nim_protocol::wire_types::{MAX_LISTING_LEN, MAX_QUERY_RESPONSE_LEN};
use nim_protocol::{decode_query, encode_query_response, messages, Query, QueryResponse};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::types::Census;

/// Decide the reply to one query.
///
/// Returns `None` when the query must be dropped silently.
pub fn answer(query: &Query, password: Option<&str>, census: &Census) -> Option<QueryResponse> {
    if let Some(expected) = password {
        if query.password != expected {
            return None;
        }
    }
    Some(build_response(census))
}

/// Turn a census into a wire response.
///
/// The count is always exact. Pairs that would push the listing past
/// `MAX_LISTING_LEN` are left out of the listing.
pub fn build_response(census: &Census) -> QueryResponse {
    let mut games = String::new();
    let mut omitted = 0usize;
    for (first, second) in &census.pairings {
        let mut pair = String::new();
        messages::push_pairing(&mut pair, first, second);
        if games.len() + pair.len() > MAX_LISTING_LEN {
            omitted += 1;
            continue;
        }
        games.push_str(&pair);
    }
    if omitted > 0 {
        warn!(omitted, "games listing truncated to fit a datagram");
    }

    QueryResponse {
        in_progress: census.in_progress() as u32,
        waiting: census.waiting.clone().unwrap_or_default(),
        games,
    }
}

/// The directory's UDP endpoint.
#[derive(Debug)]
pub struct Directory {
    socket: UdpSocket,
    password: Option<String>,
}

impl Directory {
    pub fn new(socket: UdpSocket, password: Option<String>) -> Self {
        Directory { socket, password }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Wait for the next datagram. Cancel safe.
    pub async fn recv(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf).await
    }

    /// Handle one received datagram against the current census.
    ///
    /// Errors are logged, never returned: one bad query must not disturb
    /// the dispatch loop.
    pub async fn respond(&self, datagram: &[u8], from: SocketAddr, census: &Census) {
        let query = match decode_query(datagram) {
            Ok(q) => q,
            Err(e) => {
                debug!(%from, "dropping malformed query: {}", e);
                return;
            }
        };

        let Some(response) = answer(&query, self.password.as_deref(), census) else {
            debug!(%from, "dropping query with wrong password");
            return;
        };

        let mut out = Vec::with_capacity(MAX_QUERY_RESPONSE_LEN);
        if let Err(e) = encode_query_response(&response, &mut out) {
            warn!(%from, "could not encode query response: {}", e);
            return;
        }

        match self.socket.send_to(&out, from).await {
            Ok(_) => debug!(%from, in_progress = response.in_progress, "answered query"),
            Err(e) => warn!(%from, "failed to send query response: {}", e),
        }
    }
}

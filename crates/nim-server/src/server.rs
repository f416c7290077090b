//! Sockets and the top-level dispatch loop.
//!
//! This module:
//! - Binds the directory (UDP) and play (TCP) sockets.
//! - Writes the bootstrap address file.
//! - Runs one loop that multiplexes both sockets, a sweep timer and the
//!   shutdown signal. The loop owns the [`Matchmaker`]; the waiting slot
//!   and roster are only ever touched here.
//!
//! Every wait in the loop is bounded by the sweep timer, so finished
//! matches are retired on schedule even when no traffic arrives.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use anyhow::Context;
use nim_protocol::BootstrapRecord;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::addr_file::AddressFile;
use crate::config::Config;
use crate::directory::Directory;
use crate::matchmaker::{Admission, Matchmaker};
use crate::session::{self, AuthOutcome};

/// Queries are 20 bytes; anything larger is truncated and still parsed.
const QUERY_BUFFER_LEN: usize = 512;

/// A bound, not yet running, server.
#[derive(Debug)]
pub struct Server {
    config: Config,
    listener: TcpListener,
    directory: Directory,
    addr_file: Option<AddressFile>,
}

impl Server {
    /// Bind both sockets and write the address file.
    pub async fn bind(config: Config) -> anyhow::Result<Self> {
        let query_addr = config.query_socket_string();
        let socket = UdpSocket::bind(&query_addr)
            .await
            .with_context(|| format!("problem initializing query socket on {}", query_addr))?;

        let play_addr = config.play_socket_string();
        let listener = TcpListener::bind(&play_addr)
            .await
            .with_context(|| format!("problem initializing play socket on {}", play_addr))?;

        let directory = Directory::new(socket, config.password.clone());

        let record = BootstrapRecord::new(
            config.advertise_host.clone(),
            directory.local_addr()?.port(),
            listener.local_addr()?.port(),
        );
        let addr_file = match &config.addr_file {
            Some(path) => Some(
                AddressFile::write(path, &record)
                    .with_context(|| format!("error creating address file {}", path.display()))?,
            ),
            None => None,
        };

        info!(
            query = %directory.local_addr()?,
            play = %listener.local_addr()?,
            password = config.password.is_some(),
            "nim server listening"
        );

        Ok(Server {
            config,
            listener,
            directory,
            addr_file,
        })
    }

    /// Address of the directory (UDP) socket.
    pub fn query_addr(&self) -> io::Result<SocketAddr> {
        self.directory.local_addr()
    }

    /// Address of the play (TCP) socket.
    pub fn play_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the dispatch loop until `shutdown` completes.
    ///
    /// On shutdown the address file is removed and the call returns once
    /// every match still in progress has finished on its own.
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let Server {
            config,
            listener,
            directory,
            addr_file,
        } = self;

        let mut matchmaker: Matchmaker<TcpStream> = Matchmaker::new();
        let mut buf = [0u8; QUERY_BUFFER_LEN];

        let mut sweep = tokio::time::interval(config.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }

                _ = sweep.tick() => {
                    let retired = matchmaker.sweep();
                    if retired > 0 {
                        debug!(retired, in_progress = matchmaker.in_progress(), "liveness sweep");
                    }
                }

                res = directory.recv(&mut buf) => match res {
                    Ok((n, from)) => directory.respond(&buf[..n], from, &matchmaker.census()).await,
                    Err(e) => warn!("query socket receive failed: {}", e),
                },

                res = listener.accept() => match res {
                    Ok((stream, peer)) => admit_connection(&mut matchmaker, stream, peer, &config).await,
                    Err(e) => warn!("accept failed: {}", e),
                },
            }
        }

        if let Some(file) = addr_file {
            file.remove();
        }

        let running = matchmaker.into_running();
        if !running.is_empty() {
            info!(matches = running.len(), "waiting for matches in progress to finish");
            for result in futures::future::join_all(running).await {
                if let Err(e) = result {
                    warn!("match authority ended abnormally: {}", e);
                }
            }
        }

        info!("nim server stopped");
        Ok(())
    }
}

/// Authenticate a new play connection and hand it to the matchmaker.
///
/// A failed or rejected session is logged and dropped; it never affects
/// the loop or other sessions.
async fn admit_connection(
    matchmaker: &mut Matchmaker<TcpStream>,
    stream: TcpStream,
    peer: SocketAddr,
    config: &Config,
) {
    debug!(%peer, "play connection accepted");
    if let Err(e) = stream.set_nodelay(true) {
        debug!(%peer, "set_nodelay failed: {}", e);
    }

    let outcome = session::authenticate(
        stream,
        Some(peer),
        config.password.as_deref(),
        config.auth_timeout,
    )
    .await;

    match outcome {
        Ok(AuthOutcome::Accepted(session)) => match matchmaker.admit(session) {
            Admission::Parked => debug!(%peer, "waiting for an opponent"),
            Admission::Paired(id) => debug!(%peer, match_id = %id, "paired"),
        },
        Ok(AuthOutcome::Rejected) => info!(%peer, "play request rejected: wrong password"),
        Err(e) => warn!(%peer, "discarding session: {}", e),
    }
}

//! Misère Nim matchmaking server.

use nim_server::{Config, Server};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    info!(
        bind = %config.bind_addr,
        query_port = config.query_port,
        play_port = config.play_port,
        "starting nim-server"
    );

    let server = Server::bind(config).await?;
    server.run(shutdown_signal()).await
}

/// Resolves on Ctrl-C, or on SIGTERM / SIGUSR2 where available.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let term = signal(SignalKind::terminate());
        let usr2 = signal(SignalKind::user_defined2());
        match (term, usr2) {
            (Ok(mut term), Ok(mut usr2)) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                    _ = usr2.recv() => {}
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("could not install signal handlers: {}", e);
            }
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("could not listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

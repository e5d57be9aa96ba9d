//! `serve` command: run the HTTP sync server.

use padsync_server::{http, ServerConfig, SyncServer};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Runs the server until interrupted.
pub fn run(
    bind: &str,
    presence_window_secs: u64,
    max_content_bytes: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut addr: SocketAddr = bind.parse()?;

    // Hosting platforms hand the port over via the environment.
    if let Ok(port) = std::env::var("PORT") {
        addr.set_port(port.parse()?);
    }

    let config = ServerConfig::new(addr)
        .with_presence_window(Duration::from_secs(presence_window_secs))
        .with_max_content_bytes(max_content_bytes);
    let server = Arc::new(SyncServer::new(config));

    info!(%addr, "starting padsync server");
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(http::serve(server))?;

    Ok(())
}

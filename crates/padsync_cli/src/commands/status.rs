//! `status` command: query server health.

use crate::remote;
use padsync_engine::{SyncConfig, SyncTransport};

/// Prints server health and the active-client count.
pub fn run(server_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = SyncConfig::new(server_url);
    let transport = remote::transport(&config)?;

    let health = transport.health()?;
    let presence = transport.presence()?;

    println!("status: {}", health.status);
    println!("version: {}", health.version);
    println!("active clients: {}", presence.count);

    Ok(())
}

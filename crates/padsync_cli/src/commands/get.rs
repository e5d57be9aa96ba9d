//! `get` command: print the current document.

use crate::remote;
use padsync_engine::{SyncConfig, SyncTransport};
use padsync_protocol::ReadRequest;
use std::time::{SystemTime, UNIX_EPOCH};

/// Reads and prints the current document, optionally with metadata.
pub fn run(server_url: &str, meta: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = SyncConfig::new(server_url);
    let transport = remote::transport(&config)?;

    let request = ReadRequest::new().with_client(config.client_key());
    let response = transport.read(&request)?;

    if meta {
        println!("version: {}", response.version);
        match response.last_update {
            Some(millis) => println!("updated: {}", format_age(millis)),
            None => println!("updated: never"),
        }
    }
    println!("{}", response.content);

    Ok(())
}

/// Formats an epoch-milliseconds timestamp as a rough age.
fn format_age(update_millis: u64) -> String {
    let now_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let elapsed_secs = now_millis.saturating_sub(update_millis) / 1000;
    match elapsed_secs {
        0..=59 => format!("{elapsed_secs}s ago"),
        60..=3599 => format!("{}m ago", elapsed_secs / 60),
        _ => format!("{}h ago", elapsed_secs / 3600),
    }
}

//! `set` command: overwrite the document.

use crate::remote;
use padsync_engine::{MemorySink, SyncConfig, SyncEngine};
use std::io::Read;

/// Writes new content, from the argument or stdin.
pub fn run(server_url: &str, text: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let content = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let config = SyncConfig::new(server_url);
    let transport = remote::transport(&config)?;
    let engine = SyncEngine::new(config, transport, MemorySink::new());

    // Poll first so the write carries the current version as its hint.
    engine.poll()?;
    let version = engine.push(&content)?;

    println!("ok: version {version}");
    Ok(())
}

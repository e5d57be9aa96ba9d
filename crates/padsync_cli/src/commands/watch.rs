//! `watch` command: poll for changes and print each new revision.

use crate::remote;
use padsync_engine::{MemorySink, SyncConfig, SyncEngine};
use std::time::Duration;
use tracing::{info, warn};

/// Polls the server on the given interval, printing every new revision.
pub fn run(server_url: &str, interval_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        SyncConfig::new(server_url).with_poll_interval(Duration::from_millis(interval_ms));
    let transport = remote::transport(&config)?;
    let engine = SyncEngine::new(config, transport, MemorySink::new());

    info!(interval_ms, "watching for changes");
    loop {
        match engine.poll_with_retry() {
            Ok(outcome) if outcome.changed => {
                println!("--- version {} ---", outcome.version);
                println!("{}", engine.sink().content());
            }
            Ok(_) => {}
            Err(e) => {
                // Transient failures recover on the next cycle.
                warn!(error = %e, "poll failed");
            }
        }
        std::thread::sleep(engine.config().poll_interval);
    }
}

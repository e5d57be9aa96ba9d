//! padsync CLI
//!
//! Command-line tools for the padsync shared-document service.
//!
//! # Commands
//!
//! - `serve` - Run the HTTP sync server
//! - `get` - Print the current document
//! - `set` - Overwrite the document
//! - `watch` - Poll for changes and print each new revision
//! - `status` - Query server health and the active-client count

mod commands;
mod remote;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// padsync command-line tools.
#[derive(Parser)]
#[command(name = "padsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Server URL for client commands
    #[arg(global = true, short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP sync server
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "0.0.0.0:8080")]
        bind: String,

        /// Presence recency window in seconds
        #[arg(long, default_value = "10")]
        presence_window: u64,

        /// Maximum accepted content size in bytes
        #[arg(long, default_value = "1048576")]
        max_content_bytes: usize,
    },

    /// Print the current document
    Get {
        /// Show version and timestamp metadata
        #[arg(short, long)]
        meta: bool,
    },

    /// Overwrite the document
    Set {
        /// New content (reads stdin when omitted)
        text: Option<String>,
    },

    /// Poll for changes and print each new revision
    Watch {
        /// Poll interval in milliseconds
        #[arg(short, long, default_value = "1500")]
        interval_ms: u64,
    },

    /// Query server health and the active-client count
    Status,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            bind,
            presence_window,
            max_content_bytes,
        } => {
            commands::serve::run(&bind, presence_window, max_content_bytes)?;
        }
        Commands::Get { meta } => {
            commands::get::run(&cli.server, meta)?;
        }
        Commands::Set { text } => {
            commands::set::run(&cli.server, text)?;
        }
        Commands::Watch { interval_ms } => {
            commands::watch::run(&cli.server, interval_ms)?;
        }
        Commands::Status => {
            commands::status::run(&cli.server)?;
        }
        Commands::Version => {
            println!("padsync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("protocol v{}", padsync_protocol::PROTOCOL_VERSION);
        }
    }

    Ok(())
}

//! HTTP forwarding relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                  RELAY                        │
//!     Client Request       │  ┌─────────┐   ┌────────────┐   ┌──────────┐ │
//!     ?endpoint=<url>  ────┼─▶│  http   │──▶│ translator │──▶│forwarder │─┼──▶ Destination
//!                          │  │ server  │   └────────────┘   └────┬─────┘ │
//!                          │  └─────────┘                         │       │
//!     Client Response      │  ┌─────────┐                         │       │
//!     ◀────────────────────┼──│response │◀────────────────────────┘       │
//!                          │  │emission │                                  │
//!                          │  └─────────┘                                  │
//!                          │  config · observability · lifecycle           │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use http_relay::lifecycle::startup;

#[derive(Parser)]
#[command(name = "http-relay")]
#[command(about = "Single-hop HTTP forwarding relay", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = startup::resolve_config(cli.config.as_deref(), cli.bind)?;
    startup::run(config).await?;
    Ok(())
}

//! # assetflow - Asset Lifecycle CLI
//!
//! The main binary for the assetflow portfolio tooling.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               apps/assetflow (THE BINARY)            │
//! │                                                      │
//! │  ┌─────────────┐   ┌─────────────┐   ┌────────────┐  │
//! │  │    CLI      │   │  Settings   │   │  Exports   │  │
//! │  │   (clap)    │   │ (.env, env) │   │ (CSV/JSON) │  │
//! │  └──────┬──────┘   └──────┬──────┘   └─────┬──────┘  │
//! │         └─────────────────┼────────────────┘         │
//! │                           ▼                          │
//! │                  ┌────────────────┐                  │
//! │                  │ assetflow-core │                  │
//! │                  │  (THE LOGIC)   │                  │
//! │                  └────────────────┘                  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! assetflow --root /mnt/AssetManagement inventory
//! assetflow metrics
//! assetflow transition AEN_PV025_Sunfield-Solar_Athens --phase 03 --pm "John Smith"
//! assetflow archive AEN_PV025_Sunfield-Solar_Athens -p 02_FEASIBILITY -s Financial_Model
//! ```

use assetflow::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing; ASSETFLOW_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("ASSETFLOW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "assetflow=debug,assetflow_core=debug"
    } else {
        "assetflow=info,assetflow_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the assetflow startup banner.
fn print_banner() {
    println!(
        r#"
  assetflow v{}
  Asset portfolio lifecycle on the file server
"#,
        env!("CARGO_PKG_VERSION")
    );
}

//! # che media ho? - Grade Calculator
//!
//! The main binary for the che media ho? grade average & goal engine.
//!
//! This application provides:
//! - HTTP JSON API server (axum-based)
//! - CLI interface for one-off calculations
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │               apps/chemediaho (THE BINARY)            │
//! │                                                       │
//! │     ┌─────────────┐          ┌─────────────┐          │
//! │     │    CLI      │          │  HTTP API   │          │
//! │     │   (clap)    │          │   (axum)    │          │
//! │     └──────┬──────┘          └──────┬──────┘          │
//! │            └────────────┬───────────┘                 │
//! │                         ▼                             │
//! │               ┌──────────────────┐                    │
//! │               │ chemediaho-core  │                    │
//! │               │   (THE LOGIC)    │                    │
//! │               └──────────────────┘                    │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! chemediaho server --host 0.0.0.0 --port 8080
//!
//! # CLI calculations
//! chemediaho average --grades 6,7,8
//! chemediaho goal --grades 6,7,8 --target 7.5 --num-grades auto
//! chemediaho summary -f voti.json
//! ```

use chemediaho::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // CHEMEDIAHO_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("CHEMEDIAHO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chemediaho=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
   ___ _            __  __        _ _         _         ___
  / __| |_  ___    |  \/  |___ __| (_)__ _   | |_  ___ |__ \
 | (__| ' \/ -_)   | |\/| / -_) _` | / _` |  | ' \/ _ \  /_/
  \___|_||_\___|   |_|  |_\___\__,_|_\__,_|  |_||_\___/ (_)

  Grade Calculator v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

//! # SCTP - Semantic-Graph Store Client
//!
//! The command-line binary over `sctp-client`.
//!
//! ## Usage
//!
//! ```bash
//! # Create two nodes and connect them
//! sctp create-node
//! sctp create-node --type "node|const|node_class"
//! sctp create-arc 65537 131073
//!
//! # Everything going out of a node, as JSON
//! sctp --json-mode iterate 1_1 _ _
//!
//! # Against a remote store
//! sctp -H 10.0.0.5 -p 55770 resolve nrel_main_idtf
//! ```

use sctp::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse_checked();
    init_tracing(cli.verbose);

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the subscriber. SCTP_LOG_FORMAT=json enables machine-parseable
/// output; logs go to stderr so stdout carries only command output.
fn init_tracing(verbose: bool) {
    let log_format = std::env::var("SCTP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if verbose {
        "sctp=debug,sctp_client=debug"
    } else {
        "sctp=info,sctp_client=info"
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
}

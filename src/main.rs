// Keystash — Application Entry Point
//
// Parses CLI arguments, initializes structured logging and dispatches to the
// command handler. Logs go to stderr so `read` output stays clean JSON.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use keystash::cli::{execute, Cli};

fn main() {
    // RUST_LOG=keystash=debug for verbose output. No level logs item values.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keystash=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

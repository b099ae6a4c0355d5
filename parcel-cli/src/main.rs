//! `parcel-tracker` entry point.

use clap::Parser;
use parcel_cli::Cli;

fn main() {
    // Logs go to stderr so stdout stays clean for --json output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = Cli::parse().run();
    std::process::exit(code);
}

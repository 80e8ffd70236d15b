mod config;
mod dump;
mod error;

use clap::Parser;
use config::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = dump::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

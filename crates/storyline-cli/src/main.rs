//! Storyline command-line entry point.

use std::error::Error;

use storyline_cli::config::Config;
use storyline_cli::host;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so stdout carries only the timeline.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!("Starting Storyline timeline host");

    let config = Config::from_env()?;
    let output = host::run(&config)?;
    println!("{output}");

    Ok(())
}

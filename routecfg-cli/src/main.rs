//! routecfg command-line application
//!
//! Lists, switches and maintains the providers, models and routers of an
//! AI model routing configuration.

mod cli;
mod commands;
mod ui;

use std::process::ExitCode;

use clap::Parser;
use routecfg_core::ConfigStore;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Session;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!("Starting routecfg v{}", routecfg_core::VERSION);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let store = ConfigStore::resolve(cli.config)?;
    let stdout = std::io::stdout();
    let stdin = std::io::stdin();
    let mut out = stdout.lock();
    let mut input = stdin.lock();
    Session::new(store, &mut out, &mut input)
        .run(cli.command)
        .await
}

/// Log to stderr so listings on stdout stay clean.
///
/// routecfg targets log at warn, or debug with `--verbose`; everything else
/// follows `RUST_LOG`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let mut filter = EnvFilter::from_default_env();
    for krate in ["routecfg", "routecfg_core"] {
        if let Ok(directive) = format!("{krate}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

mod app;
mod azure;
mod chat;
mod cli;
mod config;
mod error;
mod lang;
mod qa;
#[cfg(feature = "audio")]
mod speech;
mod translator;

pub const USER_AGENT: &str = concat!("lingo-qa/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lingo_qa=warn")),
        )
        .init();

    info!(?args, "starting lingo-qa");

    // Failures end the session but not with a failure status.
    match app::run(&args).await {
        Ok(summary) => info!(turns = summary.turns, "stopped"),
        Err(e) => {
            tracing::error!(kind = e.kind().label(), "session aborted: {e}");
            println!("Error: {e}");
        }
    }
}

//! Community API key CLI
//!
//! Thin wrapper over apikey-core. Logging goes to stderr so that `fetch`
//! output on stdout can be piped straight into other tools.
//!
//! Authentication: log in with a browser or another tool first, then pass the
//! session token and cookies via `--session-id` / `--cookie` or the
//! `COMMUNITY_SESSION_ID` / `COMMUNITY_COOKIES` environment variables.

use clap::Parser;
use std::process::ExitCode;

use apikey_cli::{exit_code, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut stdout = std::io::stdout();
    match run(cli, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

//! Command definitions and dispatch

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use apikey_core::{
    ApiKeyClient, ApiKeyError, CommunitySession, ReqwestTransport, Result, SettingsManager,
};

/// Community API key manager - register, fetch and revoke a Steam Web API key
#[derive(Parser, Debug)]
#[command(name = "community-apikey")]
#[command(version)]
#[command(about = "Manage the Steam Web API key of a logged-in community session")]
pub struct Cli {
    /// Session token of the logged-in session (sent as `sessionid`)
    #[arg(long, env = "COMMUNITY_SESSION_ID", hide_env_values = true)]
    pub session_id: String,

    /// Session cookie as name=value (repeatable, or ';'-separated in the env var)
    #[arg(
        long = "cookie",
        env = "COMMUNITY_COOKIES",
        value_delimiter = ';',
        hide_env_values = true
    )]
    pub cookies: Vec<String>,

    /// Directory holding settings.json (defaults to the platform config dir)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Override the community base URL from settings
    #[arg(long)]
    pub community_url: Option<String>,

    /// Write the effective settings (including --community-url) back to settings.json
    #[arg(long)]
    pub save_settings: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a new key bound to a domain
    Register {
        /// Domain the key is registered for
        #[arg(long)]
        domain: String,
    },
    /// Print the currently assigned key
    Fetch,
    /// Revoke the current key
    Revoke,
}

/// Execute a parsed command, writing user-facing output to `out`
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let mut settings = match &cli.config_dir {
        Some(dir) => SettingsManager::new(dir)?,
        None => SettingsManager::from_default_dir()?,
    };
    if let Some(url) = cli.community_url {
        settings.get_mut().community_url = url;
    }
    if cli.save_settings {
        settings.save().await?;
        info!("Saved settings");
    }

    let endpoints = settings.get().endpoints()?;
    debug!("Using key page {}", endpoints.key_page);

    let jar = ReqwestTransport::cookie_jar(cli.cookies.as_slice(), &endpoints.key_page);
    let transport = Arc::new(ReqwestTransport::from_settings(settings.get(), jar)?);
    let client = ApiKeyClient::with_endpoints(transport, endpoints)?;
    let mut session = CommunitySession::new(cli.session_id);

    match cli.command {
        Command::Register { domain } => {
            client.register(&session, &domain).await?;
            writeln!(out, "Registered API key for {}", domain)?;
        }
        Command::Fetch => {
            let key = client.fetch_into(&mut session).await?;
            writeln!(out, "{}", key.expose())?;
        }
        Command::Revoke => {
            client.revoke_and_forget(&mut session).await?;
            writeln!(out, "Revoked API key")?;
        }
    }

    info!("Command completed");
    Ok(())
}

/// Process exit code for an error
pub fn exit_code(err: &ApiKeyError) -> u8 {
    use apikey_core::ErrorKind;

    match err.kind() {
        ErrorKind::Transport => 2,
        ErrorKind::AccessDenied => 3,
        ErrorKind::Rejected => 4,
        ErrorKind::NotFound => 5,
        ErrorKind::Local => 1,
    }
}

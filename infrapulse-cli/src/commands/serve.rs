//! Serve command - run the HTTP boundary.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use infrapulse_core::Config;
use infrapulse_server::AppState;
use tracing::{info, warn};

use crate::ExitCode;

/// Arguments for the serve command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listen address. Defaults to `INFRAPULSE_BIND` or 127.0.0.1:8787.
    #[arg(long, short)]
    pub bind: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

/// Runs the serve command until shutdown.
pub async fn run(args: &ServeArgs) -> Result<ExitCode> {
    let config = Config::load().context("Failed to load configuration")?;
    let bind = args.bind.clone().unwrap_or_else(|| config.server.bind.clone());

    if config.server.admin_token.is_none() {
        warn!("INFRAPULSE_ADMIN_TOKEN is not set; every dashboard request will be rejected");
    }
    info!(configured = ?config.configured_providers(), "Starting server");

    let state = AppState::from_config(&config).context("Failed to build HTTP client")?;
    infrapulse_server::serve(Arc::new(state), &bind).await?;

    Ok(ExitCode::Success)
}

//! Dashboard command - read a running server's dashboard.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use infrapulse_core::{DashboardOutcome, ProviderKind};

use super::exit_code_for;
use crate::client::{DashboardClient, DashboardResponse};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{parse_provider_selection, Cli, ExitCode, OutputFormat};

/// Arguments for the dashboard command.
#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Server base URL.
    #[arg(long, env = "INFRAPULSE_URL", default_value = "http://127.0.0.1:8787")]
    pub url: String,

    /// Admin token.
    #[arg(long, env = "INFRAPULSE_ADMIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value = "60")]
    pub timeout: u64,
}

/// Runs the dashboard command.
pub async fn run(args: &DashboardArgs, cli: &Cli) -> Result<ExitCode> {
    let client = DashboardClient::new(&args.url, args.token.clone(), Duration::from_secs(args.timeout))?;

    let single = match cli.provider.as_deref() {
        None => None,
        Some(arg) => match parse_provider_selection(Some(arg))?.as_slice() {
            [kind] => Some(*kind),
            _ => None,
        },
    };

    let response = match single {
        Some(kind) => client.provider(kind.slug()).await?,
        None => client.dashboard().await?,
    };

    if response.status == 401 && response.body.get("configured").is_none() {
        anyhow::bail!("Server rejected the admin token");
    }
    if response.status == 404 {
        anyhow::bail!("Server does not know this provider");
    }

    print_response(&response, single, cli)?;
    Ok(exit_code(&response, single))
}

fn print_response(response: &DashboardResponse, single: Option<ProviderKind>, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            let text = match single {
                Some(kind) => formatter.format_result(kind, &response.body),
                None => formatter.format_dashboard(&response.body),
            };
            println!("{text}");
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&response.body)?);
        }
    }
    Ok(())
}

fn exit_code(response: &DashboardResponse, single: Option<ProviderKind>) -> ExitCode {
    match single {
        Some(_) if response.status == 200 && response.body["configured"] == true => ExitCode::Success,
        Some(_) => ExitCode::NoUsableProvider,
        None => serde_json::from_value::<DashboardOutcome>(response.body["outcome"].clone())
            .map_or(ExitCode::Error, exit_code_for),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: serde_json::Value) -> DashboardResponse {
        DashboardResponse { status, body }
    }

    #[test]
    fn test_exit_code_from_outcome() {
        let partial = response(200, json!({ "outcome": "partial", "providers": {} }));
        assert_eq!(exit_code(&partial, None), ExitCode::Success);

        let none = response(200, json!({ "outcome": "no_providers_configured" }));
        assert_eq!(exit_code(&none, None), ExitCode::NoUsableProvider);

        let garbage = response(200, json!({ "unexpected": true }));
        assert_eq!(exit_code(&garbage, None), ExitCode::Error);
    }

    #[test]
    fn test_exit_code_single_provider() {
        let ready = response(200, json!({ "configured": true, "summary": {} }));
        assert_eq!(exit_code(&ready, Some(ProviderKind::Neon)), ExitCode::Success);

        let missing = response(200, json!({ "configured": false, "message": "Set NEON_API_KEY" }));
        assert_eq!(exit_code(&missing, Some(ProviderKind::Neon)), ExitCode::NoUsableProvider);

        let failed = response(500, json!({ "configured": true, "error": "Failed" }));
        assert_eq!(exit_code(&failed, Some(ProviderKind::Neon)), ExitCode::NoUsableProvider);
    }
}

//! Providers command - list providers and their configuration status.

use anyhow::{Context, Result};
use infrapulse_core::{Config, Resolution};
use infrapulse_providers::ProviderRegistry;
use tracing::info;

use crate::output::{JsonFormatter, ProviderStatus, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Resolves every registered provider against the configuration.
pub fn statuses(config: &Config) -> Vec<ProviderStatus> {
    ProviderRegistry::all()
        .iter()
        .map(|desc| {
            let resolution = config.resolution(desc.id);
            let missing = match resolution {
                Resolution::Configured(_) => Vec::new(),
                Resolution::NotConfigured { required } => {
                    required.iter().map(|v| (*v).to_string()).collect()
                }
            };
            ProviderStatus {
                provider: desc.slug().to_string(),
                name: desc.display_name().to_string(),
                category: desc.category.to_string(),
                auth: desc.auth.to_string(),
                configured: resolution.is_configured(),
                accounts: resolution.accounts().len(),
                missing,
                dashboard_url: desc.dashboard_url.to_string(),
            }
        })
        .collect()
}

/// Runs the providers command. Never touches the network.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    info!("Listing providers");

    let config = Config::load().context("Failed to load configuration")?;
    let statuses = statuses(&config);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_providers_header());
            println!("{}", "─".repeat(78));
            for status in &statuses {
                println!("{}", formatter.format_provider_line(status));
            }

            println!();
            println!(
                "Total: {} providers ({} configured)",
                statuses.len(),
                statuses.iter().filter(|s| s.configured).count()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&statuses)?);
        }
    }

    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrapulse_core::EnvSnapshot;

    #[test]
    fn test_statuses_report_missing_vars() {
        let env = EnvSnapshot::from_pairs([
            ("GITHUB_TOKEN", "ghp_x"),
            ("VERCEL_TOKEN_WORK", "v1"),
            ("VERCEL_TOKEN_HOME", "v2"),
        ]);
        let config = Config::from_env(&env).unwrap();
        let statuses = statuses(&config);

        assert_eq!(statuses.len(), 9);

        let github = statuses.iter().find(|s| s.provider == "github").unwrap();
        assert!(github.configured);
        assert!(github.missing.is_empty());

        let vercel = statuses.iter().find(|s| s.provider == "vercel").unwrap();
        assert_eq!(vercel.accounts, 2);

        let neon = statuses.iter().find(|s| s.provider == "neon").unwrap();
        assert!(!neon.configured);
        assert_eq!(neon.missing, vec!["NEON_API_KEY".to_string()]);
    }
}

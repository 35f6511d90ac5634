//! Fetch command - run the aggregator in-process.

use anyhow::{Context, Result};
use infrapulse_core::Config;
use infrapulse_fetch::FetchContext;
use infrapulse_providers::Aggregator;
use tracing::info;

use super::exit_code_for;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{parse_provider_selection, Cli, ExitCode, OutputFormat};

/// Runs the fetch command.
pub async fn run(cli: &Cli) -> Result<ExitCode> {
    let providers = parse_provider_selection(cli.provider.as_deref())?;
    let config = Config::load().context("Failed to load configuration")?;
    let ctx = FetchContext::from_config(&config).context("Failed to build HTTP client")?;

    info!(providers = ?providers, "Fetching providers");
    let dashboard = Aggregator::from_config(&config).only(&providers).run(&ctx).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            let value = serde_json::to_value(&dashboard)?;
            if let [kind] = providers.as_slice() {
                println!("{}", formatter.format_result(*kind, &value["providers"][kind.slug()]));
            } else {
                println!("{}", formatter.format_dashboard(&value));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            match providers.as_slice() {
                [kind] => println!("{}", formatter.format(&dashboard.get(*kind))?),
                _ => println!("{}", formatter.format(&dashboard)?),
            }
        }
    }

    Ok(exit_code_for(dashboard.outcome))
}

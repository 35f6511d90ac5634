// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! infrapulse CLI - infrastructure provider dashboard from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Run the HTTP boundary
//! infrapulse serve --bind 0.0.0.0:8787
//!
//! # Fetch every configured provider in-process
//! infrapulse fetch
//!
//! # Fetch two providers as pretty JSON
//! infrapulse fetch --provider github,neon --format json --pretty
//!
//! # Show which providers are configured
//! infrapulse providers
//!
//! # Read a running server's dashboard
//! infrapulse dashboard --url http://127.0.0.1:8787 --token "$INFRAPULSE_ADMIN_TOKEN"
//! ```

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use infrapulse_core::ProviderKind;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{dashboard, fetch, providers, serve};

// ============================================================================
// CLI Definition
// ============================================================================

/// infrapulse CLI - infrastructure provider dashboard.
#[derive(Parser)]
#[command(name = "infrapulse")]
#[command(about = "Infrastructure provider dashboard")]
#[command(long_about = r#"
infrapulse aggregates the state of your infrastructure providers into
one dashboard.

Supported providers:
  • Cloudflare (cloudflare)
  • Vercel Blob (blob)
  • Vercel (vercel)
  • MongoDB Atlas (atlas)
  • Neon (neon)
  • Cloudinary (cloudinary)
  • GitHub (github)
  • Sentry (sentry)
  • UptimeRobot (uptimerobot)

Examples:
  infrapulse serve                    # Run the HTTP server
  infrapulse fetch                    # All configured providers
  infrapulse fetch --provider github  # Single provider
  infrapulse providers                # Configuration status
  infrapulse dashboard --format json  # Query a running server
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Provider to query (or "all").
    /// Can be comma-separated: "github,neon"
    #[arg(long, short, global = true)]
    pub provider: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server.
    Serve(serve::ServeArgs),

    /// Fetch providers in-process and print the results.
    #[command(visible_alias = "f")]
    Fetch,

    /// List providers and their configuration status.
    #[command(visible_alias = "p")]
    Providers,

    /// Read the dashboard from a running server.
    #[command(visible_alias = "d")]
    Dashboard(dashboard::DashboardArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// No provider configured, or every configured provider failed.
    NoUsableProvider = 2,
}

/// Parses a provider selection: `None` or `"all"` means every provider.
pub fn parse_provider_selection(arg: Option<&str>) -> Result<Vec<ProviderKind>> {
    match arg.map(str::to_lowercase).as_deref() {
        None | Some("all") => Ok(ProviderKind::all().to_vec()),
        Some(names) => {
            let mut providers = Vec::new();
            for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                let kind: ProviderKind = name.parse()?;
                if !providers.contains(&kind) {
                    providers.push(kind);
                }
            }
            if providers.is_empty() {
                anyhow::bail!("No valid providers specified");
            }
            Ok(providers)
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, default_directive: &str, json: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("infrapulse=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
    };

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve(args) => {
            setup_logging(cli.verbose, cli.quiet, "infrapulse=info,tower_http=info,warn", args.json_logs);
        }
        _ => setup_logging(cli.verbose, cli.quiet, "warn", false),
    }

    let result = match &cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Fetch => fetch::run(&cli).await,
        Commands::Providers => providers::run(&cli),
        Commands::Dashboard(args) => dashboard::run(args, &cli).await,
    };

    match result {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_provider_all() {
        assert_eq!(parse_provider_selection(None).unwrap().len(), 9);
        assert_eq!(parse_provider_selection(Some("ALL")).unwrap().len(), 9);
    }

    #[test]
    fn test_parse_provider_comma_separated() {
        let providers = parse_provider_selection(Some("github, neon,github")).unwrap();
        assert_eq!(providers, vec![ProviderKind::GitHub, ProviderKind::Neon]);
    }

    #[test]
    fn test_parse_provider_unknown() {
        assert!(parse_provider_selection(Some("heroku")).is_err());
        assert!(parse_provider_selection(Some(",")).is_err());
    }

    #[test]
    fn test_dashboard_args_from_flags() {
        let cli = Cli::try_parse_from([
            "infrapulse",
            "dashboard",
            "--url",
            "http://localhost:9000",
            "--token",
            "t",
            "--provider",
            "blob",
        ])
        .unwrap();
        assert_eq!(cli.provider.as_deref(), Some("blob"));
        match cli.command {
            Commands::Dashboard(args) => {
                assert_eq!(args.url, "http://localhost:9000");
                assert_eq!(args.token.as_deref(), Some("t"));
            }
            _ => panic!("expected dashboard command"),
        }
    }
}

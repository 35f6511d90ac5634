//! CLI command implementations.

pub mod dashboard;
pub mod fetch;
pub mod providers;
pub mod serve;

use infrapulse_core::DashboardOutcome;

use crate::ExitCode;

/// Exit code for a finished fan-out.
pub fn exit_code_for(outcome: DashboardOutcome) -> ExitCode {
    match outcome {
        DashboardOutcome::NoProvidersConfigured | DashboardOutcome::AllFailed => {
            ExitCode::NoUsableProvider
        }
        DashboardOutcome::Partial | DashboardOutcome::AllSucceeded => ExitCode::Success,
    }
}

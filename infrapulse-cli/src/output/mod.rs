//! Output formatting for CLI.

mod json;
mod text;

pub use json::{JsonFormatter, ProviderStatus};
pub use text::TextFormatter;

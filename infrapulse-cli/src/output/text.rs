//! Text output formatting with colors.
//!
//! Results are formatted from their wire shape so the in-process `fetch`
//! command and the remote `dashboard` command print identically.

use infrapulse_core::ProviderKind;
use serde_json::{Map, Value};

use super::json::ProviderStatus;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats a whole dashboard body.
    pub fn format_dashboard(&self, dashboard: &Value) -> String {
        let mut blocks = Vec::new();

        let outcome = dashboard["outcome"].as_str().unwrap_or("unknown");
        let generated = dashboard["generatedAt"].as_str().unwrap_or("-");
        blocks.push(format!(
            "{} {}  {}",
            self.bold("Outcome:"),
            self.color_for_outcome(outcome),
            self.dim(generated)
        ));

        if let Some(providers) = dashboard["providers"].as_object() {
            for kind in ProviderKind::all() {
                if let Some(result) = providers.get(kind.slug()) {
                    blocks.push(self.format_result(*kind, result));
                }
            }
        }

        blocks.join("\n\n")
    }

    /// Formats one provider result body.
    pub fn format_result(&self, kind: ProviderKind, result: &Value) -> String {
        let name = self.bold(kind.display_name());

        if let Some(error) = result["error"].as_str() {
            let mut line = format!("{name}: {} - {error}", self.red("Error"));
            if let Some(details) = result["details"].as_str() {
                line.push_str(&format!(" ({details})"));
            }
            return line;
        }

        if result["configured"] != true {
            let message = result["message"].as_str().unwrap_or("not configured");
            return format!("{name}: {}", self.dim(message));
        }

        let mut lines = vec![format!("{name} {}", self.green("✓"))];
        if let Some(summary) = result["summary"].as_object() {
            lines.extend(self.format_fields(summary, ""));
        }
        lines.join("\n")
    }

    /// Header line for the providers listing.
    pub fn format_providers_header(&self) -> String {
        self.bold(&format!(
            "{:<14} {:<16} {:<28} {}",
            "Provider", "Auth", "Category", "Status"
        ))
    }

    /// One line of the providers listing.
    pub fn format_provider_line(&self, status: &ProviderStatus) -> String {
        let state = if status.configured {
            let accounts = if status.accounts > 1 {
                format!(" ({} accounts)", status.accounts)
            } else {
                String::new()
            };
            format!("{}{accounts}", self.green("✓ configured"))
        } else {
            format!("{} set {}", self.red("✗"), status.missing.join(", "))
        };

        format!(
            "{:<14} {:<16} {:<28} {}",
            status.provider, status.auth, status.category, state
        )
    }

    // ========================================================================
    // Summary fields
    // ========================================================================

    fn format_fields(&self, fields: &Map<String, Value>, prefix: &str) -> Vec<String> {
        let mut lines = Vec::new();
        for (key, value) in fields {
            let label = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                Value::Object(nested) => lines.extend(self.format_fields(nested, &label)),
                Value::Number(n) => {
                    let rendered = match n.as_f64() {
                        Some(v) if is_byte_field(key) => format_bytes(v),
                        Some(v) => format_number(v),
                        None => n.to_string(),
                    };
                    lines.push(format!("  {:<24} {}", label, self.cyan(&rendered)));
                }
                Value::String(s) => lines.push(format!("  {label:<24} {s}")),
                Value::Bool(b) => lines.push(format!("  {label:<24} {b}")),
                Value::Null | Value::Array(_) => {}
            }
        }
        lines
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_outcome(&self, outcome: &str) -> String {
        match outcome {
            "all_succeeded" => self.green(outcome),
            "partial" => self.yellow(outcome),
            "all_failed" => self.red(outcome),
            _ => self.dim(outcome),
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn is_byte_field(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.contains("bytes") || key.starts_with("bandwidth")
}

/// Formats a count with K/M suffixes; fractions keep one decimal.
pub fn format_number(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format!("{n:.1}")
    }
}

/// Formats a byte count with binary units.
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{value:.0} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

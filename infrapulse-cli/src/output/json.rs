//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// Configuration status of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    /// URL/CLI slug.
    pub provider: String,
    /// Display name.
    pub name: String,
    /// What kind of infrastructure it is.
    pub category: String,
    /// How requests are authenticated.
    pub auth: String,
    /// Whether credentials are present.
    pub configured: bool,
    /// Number of configured accounts.
    pub accounts: usize,
    /// Variables that would enable the provider.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// Where a human manages the account.
    pub dashboard_url: String,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serializes any value.
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(output)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_status_skips_empty_missing() {
        let status = ProviderStatus {
            provider: "github".to_string(),
            name: "GitHub".to_string(),
            category: "Source control".to_string(),
            auth: "bearer token".to_string(),
            configured: true,
            accounts: 1,
            missing: Vec::new(),
            dashboard_url: "https://github.com/settings/tokens".to_string(),
        };
        let output = JsonFormatter::new(false).format(&status).unwrap();
        assert!(output.contains(r#""dashboardUrl""#));
        assert!(!output.contains("missing"));
    }
}

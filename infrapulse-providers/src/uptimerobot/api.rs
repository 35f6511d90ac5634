//! UptimeRobot API v2 schemas.

use serde::Deserialize;

/// UptimeRobot API base URL.
pub const UPTIMEROBOT_API_BASE: &str = "https://api.uptimerobot.com/v2";

/// Monitors requested per page (the API maximum).
pub const PAGE_LIMIT: u64 = 50;

/// Windows for `custom_uptime_ratios`, in days.
pub const UPTIME_WINDOWS: &str = "1-7-30";

/// `POST /getMonitors` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMonitorsResponse {
    /// `ok` or `fail`.
    pub stat: String,
    /// Paging block.
    #[serde(default)]
    pub pagination: Option<RawPagination>,
    /// Monitors on this page.
    #[serde(default)]
    pub monitors: Vec<RawMonitor>,
    /// Present when `stat` is `fail`.
    #[serde(default)]
    pub error: Option<RawError>,
}

/// Paging block.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPagination {
    /// Offset of this page.
    #[serde(default)]
    pub offset: u64,
    /// Monitors across all pages.
    #[serde(default)]
    pub total: u64,
}

/// Error block.
#[derive(Debug, Clone, Deserialize)]
pub struct RawError {
    /// `invalid_parameter`, `missing_parameter`, ...
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Offending parameter.
    #[serde(default)]
    pub parameter_name: Option<String>,
    /// Message.
    #[serde(default)]
    pub message: Option<String>,
}

impl RawError {
    /// Whether the API key was rejected.
    pub fn is_api_key_error(&self) -> bool {
        self.parameter_name.as_deref() == Some("api_key")
            || self
                .message
                .as_deref()
                .is_some_and(|m| m.to_ascii_lowercase().contains("api_key"))
    }
}

/// A monitor.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMonitor {
    /// Monitor id.
    pub id: u64,
    /// Display name.
    pub friendly_name: String,
    /// Target URL or host.
    #[serde(default)]
    pub url: Option<String>,
    /// 1 HTTP, 2 keyword, 3 ping, 4 port, 5 heartbeat.
    #[serde(rename = "type", default)]
    pub monitor_type: u8,
    /// 0 paused, 1 not checked yet, 2 up, 8 seems down, 9 down.
    #[serde(default)]
    pub status: u8,
    /// Check interval, seconds.
    #[serde(default)]
    pub interval: u64,
    /// Dash-separated ratios for the requested windows.
    #[serde(default)]
    pub custom_uptime_ratio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        let json = r#"{
            "stat": "ok",
            "pagination": {"offset": 0, "limit": 50, "total": 2},
            "monitors": [
                {"id": 777, "friendly_name": "API", "url": "https://api.example.com", "type": 1,
                 "status": 2, "interval": 300, "custom_uptime_ratio": "100.000-99.950-99.990"}
            ]
        }"#;
        let page: RawMonitorsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.pagination.unwrap().total, 2);
        assert_eq!(page.monitors[0].custom_uptime_ratio.as_deref(), Some("100.000-99.950-99.990"));
    }

    #[test]
    fn test_api_key_error() {
        let json = r#"{"stat": "fail", "error": {"type": "invalid_parameter",
            "parameter_name": "api_key", "passed_value": "x", "message": "api_key is invalid."}}"#;
        let page: RawMonitorsResponse = serde_json::from_str(json).unwrap();
        assert!(page.error.unwrap().is_api_key_error());
    }
}

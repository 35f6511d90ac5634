//! UptimeRobot normalized summary.

use serde::Serialize;

use super::api::RawMonitor;
use crate::normalize::round_to;

/// Normalized UptimeRobot data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeRobotSummary {
    /// Scalar counts.
    pub summary: UptimeCounts,
    /// Every monitor, in upstream order.
    pub monitors: Vec<MonitorRecord>,
}

/// Scalar counts and average uptime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeCounts {
    /// Monitors.
    pub monitors: u64,
    /// Up.
    pub up: u64,
    /// Down or seemingly down.
    pub down: u64,
    /// Paused.
    pub paused: u64,
    /// Not checked yet.
    pub unknown: u64,
    /// Average 1-day uptime, percent.
    #[serde(rename = "averageUptime1d")]
    pub average_uptime_1d: Option<f64>,
    /// Average 7-day uptime, percent.
    #[serde(rename = "averageUptime7d")]
    pub average_uptime_7d: Option<f64>,
    /// Average 30-day uptime, percent.
    #[serde(rename = "averageUptime30d")]
    pub average_uptime_30d: Option<f64>,
}

/// Monitor status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    /// Paused.
    Paused,
    /// Not checked yet.
    Unknown,
    /// Up.
    Up,
    /// Down or seemingly down.
    Down,
}

impl MonitorStatus {
    /// Maps the numeric status.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Paused,
            2 => Self::Up,
            8 | 9 => Self::Down,
            _ => Self::Unknown,
        }
    }
}

/// A monitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorRecord {
    /// Monitor id.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `http`, `keyword`, `ping`, `port`, `heartbeat`.
    pub monitor_type: &'static str,
    /// Status.
    pub status: MonitorStatus,
    /// Check interval, seconds.
    pub interval_seconds: u64,
    /// Uptime over 1/7/30 days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<UptimeRatios>,
}

/// Uptime ratios, percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeRatios {
    /// Last day.
    #[serde(rename = "day1")]
    pub day: f64,
    /// Last 7 days.
    #[serde(rename = "day7")]
    pub week: f64,
    /// Last 30 days.
    #[serde(rename = "day30")]
    pub month: f64,
}

/// Parses `"99.9-99.8-99.7"`.
pub fn parse_ratios(raw: &str) -> Option<UptimeRatios> {
    let mut parts = raw.split('-').map(|p| p.trim().parse::<f64>());
    let day = parts.next()?.ok()?;
    let week = parts.next()?.ok()?;
    let month = parts.next()?.ok()?;
    Some(UptimeRatios { day, week, month })
}

fn monitor_type(code: u8) -> &'static str {
    match code {
        1 => "http",
        2 => "keyword",
        3 => "ping",
        4 => "port",
        5 => "heartbeat",
        _ => "other",
    }
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| round_to(sum / f64::from(n), 3))
}

/// Builds the summary.
pub fn summarize(monitors: Vec<RawMonitor>) -> UptimeRobotSummary {
    let mut counts = UptimeCounts {
        monitors: monitors.len() as u64,
        ..UptimeCounts::default()
    };

    let monitors: Vec<MonitorRecord> = monitors
        .into_iter()
        .map(|m| {
            let status = MonitorStatus::from_code(m.status);
            match status {
                MonitorStatus::Up => counts.up += 1,
                MonitorStatus::Down => counts.down += 1,
                MonitorStatus::Paused => counts.paused += 1,
                MonitorStatus::Unknown => counts.unknown += 1,
            }
            MonitorRecord {
                id: m.id,
                name: m.friendly_name,
                url: m.url,
                monitor_type: monitor_type(m.monitor_type),
                status,
                interval_seconds: m.interval,
                uptime: m.custom_uptime_ratio.as_deref().and_then(parse_ratios),
            }
        })
        .collect();

    let ratios: Vec<UptimeRatios> = monitors.iter().filter_map(|m| m.uptime).collect();
    counts.average_uptime_1d = average(ratios.iter().map(|r| r.day));
    counts.average_uptime_7d = average(ratios.iter().map(|r| r.week));
    counts.average_uptime_30d = average(ratios.iter().map(|r| r.month));

    UptimeRobotSummary {
        summary: counts,
        monitors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(id: u64, status: u8, ratios: Option<&str>) -> RawMonitor {
        RawMonitor {
            id,
            friendly_name: format!("m{id}"),
            url: None,
            monitor_type: 1,
            status,
            interval: 300,
            custom_uptime_ratio: ratios.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_ratios() {
        let ratios = parse_ratios("100.000-99.950-99.990").unwrap();
        assert_eq!(ratios.week, 99.95);
        assert!(parse_ratios("100-99").is_none());
        assert!(parse_ratios("n/a").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(MonitorStatus::from_code(0), MonitorStatus::Paused);
        assert_eq!(MonitorStatus::from_code(1), MonitorStatus::Unknown);
        assert_eq!(MonitorStatus::from_code(2), MonitorStatus::Up);
        assert_eq!(MonitorStatus::from_code(8), MonitorStatus::Down);
        assert_eq!(MonitorStatus::from_code(9), MonitorStatus::Down);
    }

    #[test]
    fn test_summarize_averages() {
        let summary = summarize(vec![
            monitor(1, 2, Some("100-100-100")),
            monitor(2, 9, Some("90-95-98")),
            monitor(3, 0, None),
            monitor(4, 1, None),
        ]);
        let counts = summary.summary;
        assert_eq!((counts.up, counts.down, counts.paused, counts.unknown), (1, 1, 1, 1));
        assert_eq!(counts.average_uptime_1d, Some(95.0));
        assert_eq!(counts.average_uptime_7d, Some(97.5));
        assert_eq!(counts.average_uptime_30d, Some(99.0));
    }

    #[test]
    fn test_no_monitors_has_no_average() {
        let summary = summarize(Vec::new());
        assert_eq!(summary.summary.average_uptime_1d, None);
    }
}

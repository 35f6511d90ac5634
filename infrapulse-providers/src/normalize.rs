//! Small helpers shared by the normalization steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Rounds to a fixed number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `part / whole` as a percentage rounded to one decimal; 0 for an empty whole.
#[allow(clippy::cast_precision_loss)]
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, 1)
}

/// Splits 100% across `parts` in tenths of a percent, so the rounded shares
/// add up to exactly 100.0 when the parts sum to `whole`.
///
/// Largest-remainder apportionment: every share is floored, then the
/// leftover tenths go to the largest remainders (earlier index on ties).
/// An empty whole yields zeros.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn apportion_percent(parts: &[u64], whole: u64) -> Vec<f64> {
    const TENTHS: u128 = 1000;

    if whole == 0 {
        return vec![0.0; parts.len()];
    }
    let whole = u128::from(whole);

    let mut shares: Vec<u128> = Vec::with_capacity(parts.len());
    let mut remainders: Vec<(usize, u128)> = Vec::with_capacity(parts.len());
    for (index, part) in parts.iter().enumerate() {
        let scaled = u128::from(*part) * TENTHS;
        shares.push(scaled / whole);
        remainders.push((index, scaled % whole));
    }

    let assigned: u128 = shares.iter().sum();
    let total: u128 = parts.iter().map(|p| u128::from(*p)).sum::<u128>() * TENTHS / whole;
    let leftover = total.saturating_sub(assigned) as usize;

    remainders.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (index, _) in remainders.into_iter().take(leftover) {
        shares[index] += 1;
    }

    shares.into_iter().map(|tenths| tenths as f64 / 10.0).collect()
}

/// Converts epoch milliseconds into a timestamp.
pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Accepts a number or a numeric string (some APIs quote large integers).
pub fn flexible_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Float(f64),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Raw::Float(f) => Ok(f.max(0.0) as u64),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Raw::Null(()) => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "flexible_u64")]
        value: u64,
    }

    fn parse(json: &str) -> Result<u64, serde_json::Error> {
        serde_json::from_str::<Sample>(json).map(|s| s.value)
    }

    #[test]
    fn test_flexible_u64() {
        assert_eq!(parse(r#"{"value": 42}"#).unwrap(), 42);
        assert_eq!(parse(r#"{"value": "1024"}"#).unwrap(), 1024);
        assert_eq!(parse(r#"{"value": null}"#).unwrap(), 0);
        assert!(parse(r#"{"value": "lots"}"#).is_err());
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(1, 3), 33.3);
        assert_eq!(percent_of(2, 3), 66.7);
        assert_eq!(percent_of(5, 0), 0.0);
    }

    #[test]
    fn test_apportion_percent_sums_to_hundred() {
        let shares = apportion_percent(&[100; 6], 600);
        assert_eq!(shares.iter().filter(|s| **s == 16.7).count(), 4);
        assert_eq!(shares.iter().filter(|s| **s == 16.6).count(), 2);
        assert_eq!((shares.iter().sum::<f64>() * 10.0).round(), 1000.0);

        assert_eq!(apportion_percent(&[1, 2], 3), vec![33.3, 66.7]);
        assert_eq!(apportion_percent(&[1, 1, 1], 3), vec![33.4, 33.3, 33.3]);
        assert_eq!(apportion_percent(&[7, 0], 0), vec![0.0, 0.0]);
        assert!(apportion_percent(&[], 10).is_empty());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(99.98765, 2), 99.99);
        assert_eq!(round_to(0.05, 1), 0.1);
    }

    #[test]
    fn test_from_millis() {
        let ts = from_millis(1_700_000_000_000).unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}

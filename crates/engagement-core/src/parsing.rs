//! Cell-level parsing for the tabular inputs.
//!
//! Spreadsheet exports are loose about types: integers show up as `"12.0"`,
//! identifiers carry stray whitespace and timestamps come in several shapes.
//! The `deserialize_*` helpers are wired into the models via
//! `#[serde(deserialize_with = ...)]`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserialize, Deserializer};

use crate::error::{ReportError, Result};

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses `created_time` cells, keeping the offset they were written in.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Parse a timestamp string.
    ///
    /// Handles:
    /// * RFC 3339 with `Z` or `+hh:mm` suffix
    /// * `%Y-%m-%dT%H:%M:%S%z` (`+0000` offsets, common in API exports)
    /// * naive date-times and plain dates, read as `+00:00`
    pub fn parse(s: &str) -> Result<DateTime<FixedOffset>> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ReportError::TimestampParse(s.to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt);
        }

        const OFFSET_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%z",
            "%Y-%m-%dT%H:%M:%S%.f%z",
            "%Y-%m-%d %H:%M:%S%z",
            "%Y-%m-%d %H:%M:%S%:z",
        ];
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Ok(dt);
            }
        }

        const NAIVE_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
        ];
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::at_utc(naive));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(Self::at_utc(naive));
            }
        }

        Err(ReportError::TimestampParse(s.to_string()))
    }

    fn at_utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
        Utc.from_utc_datetime(&naive).fixed_offset()
    }
}

// ── Count parsing ─────────────────────────────────────────────────────────────

/// Parse a non-negative integer count, accepting integral decimals like
/// `"12.0"`.
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

// ── Identifier normalisation ──────────────────────────────────────────────────

/// Canonical form of a join key: trimmed, with an all-zero decimal tail
/// dropped so `"1.0"` and `"1"` name the same row.
pub fn normalize_id(s: &str) -> String {
    let s = s.trim();
    if let Some((int, frac)) = s.split_once('.') {
        let digits = int.strip_prefix('-').unwrap_or(int);
        let integral = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
        if integral && !frac.is_empty() && frac.bytes().all(|b| b == b'0') {
            return int.to_string();
        }
    }
    s.to_string()
}

// ── serde adapters ────────────────────────────────────────────────────────────

pub fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_id(&raw))
}

pub fn deserialize_optional_id<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let id = normalize_id(&raw);
    Ok((!id.is_empty()).then_some(id))
}

pub fn deserialize_optional_text<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

pub fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_count(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid count value: {:?}", raw)))
}

pub fn deserialize_optional_count<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_count(&raw)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid count value: {:?}", raw)))
}

pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    TimestampProcessor::parse(&raw)
        .map(Some)
        .map_err(de::Error::custom)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

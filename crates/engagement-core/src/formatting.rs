//! Text rendering of metric values for charts and the results table.

use crate::models::InteractionScore;

/// Placeholder for a value that was not available after the joins.
pub const MISSING: &str = "n/a";

/// Placeholder for an interaction score with a zero denominator.
pub const UNDEFINED: &str = "undefined";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use engagement_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` starts with "0." (e.g. "0.50"); keep only ".50".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an already-rounded metric with up to four decimals and no trailing
/// zeros, the way the results table shows z-scores and interaction scores.
///
/// # Examples
///
/// ```
/// use engagement_core::formatting::format_metric;
///
/// assert_eq!(format_metric(0.1), "0.1");
/// assert_eq!(format_metric(-1.2346), "-1.2346");
/// assert_eq!(format_metric(2.0), "2.0");
/// ```
pub fn format_metric(value: f64) -> String {
    let fixed = format!("{:.4}", value);
    let trimmed = fixed.trim_end_matches('0');
    let text = if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    };
    if text == "-0.0" {
        "0.0".to_string()
    } else {
        text
    }
}

/// Table cell for an interaction score.
pub fn format_interaction(score: &InteractionScore) -> String {
    match score {
        InteractionScore::Value(v) => format_metric(*v),
        InteractionScore::MissingFollowers => MISSING.to_string(),
        InteractionScore::ZeroFollowers => UNDEFINED.to_string(),
    }
}

/// Table cell for a joined text column.
pub fn format_optional_text(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

/// Table cell for a joined count column.
pub fn format_optional_count(value: Option<u64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

/// Table cell for a boolean flag.
pub fn format_flag(flag: bool) -> String {
    let text = if flag { "True" } else { "False" };
    text.to_string()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! Presentation helpers: rate units, short durations, addresses and end dates
//!
//! None of these feed back into valuation. They only turn numbers the core
//! produced into the text the payments page shows.

use super::stream::{Stream, BASE_UNITS_PER_COIN};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl RateUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateUnit::Second => "s",
            RateUnit::Minute => "min",
            RateUnit::Hour => "hr",
            RateUnit::Day => "day",
            RateUnit::Week => "week",
            RateUnit::Month => "month",
            RateUnit::Year => "year",
        }
    }

    /// Factor from the previous (finer) unit to this one
    fn step(&self) -> f64 {
        match self {
            RateUnit::Second => 1.0,
            RateUnit::Minute => 60.0,
            RateUnit::Hour => 60.0,
            RateUnit::Day => 24.0,
            RateUnit::Week => 7.0,
            // a month is four weeks here, a year twelve such months
            RateUnit::Month => 4.0,
            RateUnit::Year => 12.0,
        }
    }

    pub fn all() -> [RateUnit; 7] {
        [
            RateUnit::Second,
            RateUnit::Minute,
            RateUnit::Hour,
            RateUnit::Day,
            RateUnit::Week,
            RateUnit::Month,
            RateUnit::Year,
        ]
    }
}

/// Express a per-second rate in the first unit where its magnitude reaches 1.
///
/// Zero stays per-second; anything too small for a month is shown per year.
pub fn scale_rate(rate_per_sec: f64) -> (f64, RateUnit) {
    if rate_per_sec == 0.0 {
        return (0.0, RateUnit::Second);
    }

    let mut value = rate_per_sec;
    for unit in RateUnit::all() {
        value *= unit.step();
        if value.abs() >= 1.0 || unit == RateUnit::Year {
            return (value, unit);
        }
    }

    (value, RateUnit::Year)
}

/// Render a rate given in principal units per second, e.g. `"1.5 APT / min"`
pub fn format_rate(rate_per_sec: f64, symbol: &str) -> String {
    let (value, unit) = scale_rate(rate_per_sec);
    format!("{} {} / {}", format_decimal(value, 3), symbol, unit.as_str())
}

/// Render a base-unit rate per second in principal units
pub fn format_base_rate(base_units_per_sec: f64, symbol: &str) -> String {
    format_rate(base_units_per_sec / BASE_UNITS_PER_COIN as f64, symbol)
}

/// At most `max_fraction` digits, trailing zeros trimmed, thousands grouped
pub fn format_decimal(value: f64, max_fraction: usize) -> String {
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Short human duration, e.g. `"3.50 days"`
pub fn format_duration_short(duration_ms: i64) -> String {
    let seconds = duration_ms as f64 / 1000.0;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let years = days / 7.0 / 4.0 / 12.0;

    if years >= 1.0 {
        format!("{:.2} years", years)
    } else if days >= 1.0 {
        format!("{:.2} days", days)
    } else if hours >= 1.0 {
        format!("{:.2} hours", hours)
    } else if minutes >= 1.0 {
        format!("{:.2} minutes", minutes)
    } else {
        format!("{:.2} seconds", seconds)
    }
}

/// `0x1234...abcd` form of a ledger address
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// UTC end instant of an accepted stream; `None` while pending
pub fn format_end_date(stream: &Stream) -> Option<String> {
    if stream.is_pending() {
        return None;
    }

    DateTime::<Utc>::from_timestamp_millis(stream.end_timestamp_ms())
        .map(|end| end.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

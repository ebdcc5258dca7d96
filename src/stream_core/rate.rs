//! Net flow rate across incoming and outgoing streams

use super::categorizer::{categorize, CategorizedStreams};
use super::stream::{Stream, TimestampMs};
use super::valuation::rate_per_second;

/// Sum of per-second release rates of the active streams, in base units
fn active_rate(categorized: &CategorizedStreams) -> f64 {
    categorized
        .active
        .iter()
        .filter_map(|s| rate_per_second(s).ok())
        .sum()
}

/// Signed net rate in base units per second: incoming minus outgoing.
///
/// Only active streams count. Streams that cannot be valued are skipped.
pub fn net_rate(incoming: &[Stream], outgoing: &[Stream], now: TimestampMs) -> f64 {
    net_rate_of(&categorize(incoming, now), &categorize(outgoing, now))
}

/// Net rate over streams that are already categorized
pub fn net_rate_of(incoming: &CategorizedStreams, outgoing: &CategorizedStreams) -> f64 {
    active_rate(incoming) - active_rate(outgoing)
}

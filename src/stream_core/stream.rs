//! Stream record as decoded from the ledger

use serde::{Deserialize, Serialize};

/// Wall-clock milliseconds since the Unix epoch
pub type TimestampMs = i64;

/// Base units per principal unit (8 decimal places)
pub const BASE_UNITS_PER_COIN: u64 = 100_000_000;

/// Sentinel start timestamp of a stream the recipient has not accepted yet
pub const NOT_STARTED: TimestampMs = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub sender: String,
    pub recipient: String,
    /// Total committed amount in base units
    pub total_amount: u64,
    pub duration_ms: i64,
    pub start_timestamp_ms: TimestampMs,
    pub stream_id: u64,
}

impl Stream {
    /// Check if the recipient has not accepted this stream yet
    pub fn is_pending(&self) -> bool {
        self.start_timestamp_ms == NOT_STARTED
    }

    /// End instant of the stream. Meaningless while pending.
    pub fn end_timestamp_ms(&self) -> TimestampMs {
        self.start_timestamp_ms.saturating_add(self.duration_ms)
    }

    /// Total amount in principal units, for display only
    pub fn total_display(&self) -> f64 {
        to_display_amount(self.total_amount)
    }
}

/// Convert base units to a display float (÷ 10^8)
pub fn to_display_amount(base_units: u64) -> f64 {
    base_units as f64 / BASE_UNITS_PER_COIN as f64
}

/// Current wall-clock reading in milliseconds
pub fn current_timestamp_ms() -> TimestampMs {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
pub(crate) fn test_stream(stream_id: u64, total_amount: u64, start: TimestampMs, duration: i64) -> Stream {
    Stream {
        sender: "0xsender".to_string(),
        recipient: "0xrecipient".to_string(),
        total_amount,
        duration_ms: duration,
        start_timestamp_ms: start,
        stream_id,
    }
}

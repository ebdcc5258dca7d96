//! Lifecycle phase and released/remaining amounts of a stream at an instant
//!
//! Amounts are computed in base units with `u128` intermediates so that the
//! boundaries (nothing released, everything released) are exact.

use super::error::ValuationError;
use super::stream::{to_display_amount, Stream, TimestampMs};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Pending,
    Active,
    Completed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pending => "pending",
            Phase::Active => "active",
            Phase::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    pub phase: Phase,
    /// Share of the duration elapsed, clamped to [0, 1]. `None` while pending.
    pub elapsed_fraction: Option<f64>,
    /// Base units unlocked to the recipient so far
    pub released_amount: u64,
    /// Base units not yet unlocked (sender-side view)
    pub remaining_amount: u64,
}

impl Valuation {
    pub fn released_display(&self) -> f64 {
        to_display_amount(self.released_amount)
    }

    pub fn remaining_display(&self) -> f64 {
        to_display_amount(self.remaining_amount)
    }
}

/// Evaluate a stream against the supplied clock reading
pub fn evaluate(stream: &Stream, now: TimestampMs) -> Result<Valuation, ValuationError> {
    if stream.duration_ms <= 0 {
        return Err(ValuationError::InvalidDuration {
            stream_id: stream.stream_id,
            duration_ms: stream.duration_ms,
        });
    }

    if stream.is_pending() {
        return Ok(Valuation {
            phase: Phase::Pending,
            elapsed_fraction: None,
            released_amount: 0,
            remaining_amount: stream.total_amount,
        });
    }

    if now >= stream.end_timestamp_ms() {
        return Ok(Valuation {
            phase: Phase::Completed,
            elapsed_fraction: Some(1.0),
            released_amount: stream.total_amount,
            remaining_amount: 0,
        });
    }

    // A clock reading before the start counts as nothing elapsed
    let elapsed = now
        .saturating_sub(stream.start_timestamp_ms)
        .clamp(0, stream.duration_ms);
    let elapsed_fraction = (elapsed as f64 / stream.duration_ms as f64).clamp(0.0, 1.0);

    // elapsed <= duration, so the quotient never exceeds total_amount
    let released_amount =
        (stream.total_amount as u128 * elapsed as u128 / stream.duration_ms as u128) as u64;

    Ok(Valuation {
        phase: Phase::Active,
        elapsed_fraction: Some(elapsed_fraction),
        released_amount,
        remaining_amount: stream.total_amount.saturating_sub(released_amount),
    })
}

/// Per-second release rate in base units
pub fn rate_per_second(stream: &Stream) -> Result<f64, ValuationError> {
    if stream.duration_ms <= 0 {
        return Err(ValuationError::InvalidDuration {
            stream_id: stream.stream_id,
            duration_ms: stream.duration_ms,
        });
    }
    Ok(stream.total_amount as f64 / (stream.duration_ms as f64 / 1000.0))
}

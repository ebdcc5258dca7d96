//! Stable partition of streams by lifecycle phase

use super::error::ValuationError;
use super::stream::{Stream, TimestampMs};
use super::valuation::{evaluate, Phase};
use serde::Serialize;

/// Status filter offered on the incoming payments page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Pending and active streams
    #[default]
    Active,
    Completed,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Active => "Active",
            StatusFilter::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(StatusFilter::Active),
            "Completed" => Some(StatusFilter::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorizedStreams {
    pub pending: Vec<Stream>,
    pub active: Vec<Stream>,
    pub completed: Vec<Stream>,
    /// Streams that could not be valued, excluded from every phase bucket
    #[serde(skip)]
    pub invalid: Vec<(Stream, ValuationError)>,
}

impl CategorizedStreams {
    pub fn bucket(&self, phase: Phase) -> &[Stream] {
        match phase {
            Phase::Pending => &self.pending,
            Phase::Active => &self.active,
            Phase::Completed => &self.completed,
        }
    }

    /// Number of streams across the three phase buckets
    pub fn len(&self) -> usize {
        self.pending.len() + self.active.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Streams shown under a status filter. `Active` lists pending streams first.
    pub fn by_status(&self, status: StatusFilter) -> Vec<Stream> {
        match status {
            StatusFilter::Active => self
                .pending
                .iter()
                .chain(self.active.iter())
                .cloned()
                .collect(),
            StatusFilter::Completed => self.completed.clone(),
        }
    }
}

/// Partition streams into pending/active/completed, preserving input order
pub fn categorize(streams: &[Stream], now: TimestampMs) -> CategorizedStreams {
    let mut categorized = CategorizedStreams::default();

    for stream in streams {
        match evaluate(stream, now) {
            Ok(valuation) => {
                let bucket = match valuation.phase {
                    Phase::Pending => &mut categorized.pending,
                    Phase::Active => &mut categorized.active,
                    Phase::Completed => &mut categorized.completed,
                };
                bucket.push(stream.clone());
            }
            Err(e) => {
                log::warn!("⚠️  Excluding stream {}: {}", stream.stream_id, e);
                categorized.invalid.push((stream.clone(), e));
            }
        }
    }

    categorized
}

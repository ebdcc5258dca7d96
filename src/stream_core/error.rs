//! Error types for stream valuation and ledger record decoding
//!
//! All of these are per-record: a caller skips the offending stream or event
//! and carries on with the rest of the batch.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuationError {
    /// A stream with a zero or negative duration has no defined rate
    InvalidDuration { stream_id: u64, duration_ms: i64 },
}

impl std::fmt::Display for ValuationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValuationError::InvalidDuration { stream_id, duration_ms } => write!(
                f,
                "Invalid duration for stream {}: {}ms (must be > 0)",
                stream_id, duration_ms
            ),
        }
    }
}

impl std::error::Error for ValuationError {}

/// Columns of a ledger stream record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreamField {
    Counterparty,
    StartTimestamp,
    Duration,
    Amount,
    StreamId,
}

impl StreamField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamField::Counterparty => "counterparty",
            StreamField::StartTimestamp => "start_timestamp",
            StreamField::Duration => "duration",
            StreamField::Amount => "amount",
            StreamField::StreamId => "stream_id",
        }
    }
}

/// One ledger record that could not be decoded into a `Stream`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedStreamRecord {
    pub index: usize,
    pub field: StreamField,
    pub value: String,
    pub reason: String,
}

impl std::fmt::Display for MalformedStreamRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Malformed stream record {}: field '{}' = {}: {}",
            self.index,
            self.field.as_str(),
            self.value,
            self.reason
        )
    }
}

impl std::error::Error for MalformedStreamRecord {}

/// The view response as a whole could not be decoded
#[derive(Debug)]
pub enum IngestError {
    Shape(serde_json::Error),
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Shape(err)
    }
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Shape(e) => write!(f, "Unexpected view response shape: {}", e),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Shape(e) => Some(e),
        }
    }
}

/// One ledger event that could not be decoded into a `StreamEvent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedEvent {
    pub index: usize,
    pub reason: String,
}

impl std::fmt::Display for MalformedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Malformed event {}: {}", self.index, self.reason)
    }
}

impl std::error::Error for MalformedEvent {}

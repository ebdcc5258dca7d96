//! Stream Core - Valuation, Categorization and Flow Rate
//!
//! Pure functions over stream records decoded from the ledger. Every operation
//! takes the current time as an argument; nothing here reads the clock or
//! holds state between calls.
//!
//! # Architecture
//!
//! ```text
//! Ledger view response → ingestion → Stream
//!     ↓
//! valuation::evaluate (phase, released, remaining)
//!     ↓
//! categorizer (pending / active / completed)   sorter (SortKey)
//!     ↓
//! rate::net_rate (incoming − outgoing, active only)
//!     ↓
//! display (rate units, durations, addresses)
//!
//! Ledger event stores → events (filter by stream id, order by timestamp)
//! ```

pub mod categorizer;
pub mod display;
pub mod error;
pub mod events;
pub mod ingestion;
pub mod rate;
pub mod sorter;
pub mod stream;
pub mod valuation;

pub use categorizer::{categorize, CategorizedStreams, StatusFilter};
pub use error::{IngestError, MalformedEvent, MalformedStreamRecord, StreamField, ValuationError};
pub use events::{EventBatch, EventStore, SortOrder, StreamEvent, StreamEventKind};
pub use ingestion::{ingest_view_response, IngestReport, StreamSide};
pub use rate::{net_rate, net_rate_of};
pub use sorter::{sort, SortKey};
pub use stream::{current_timestamp_ms, to_display_amount, Stream, TimestampMs};
pub use valuation::{evaluate, Phase, Valuation};

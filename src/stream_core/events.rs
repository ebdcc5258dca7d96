//! Stream event history from the ledger's module event stores

use super::error::MalformedEvent;
use super::stream::TimestampMs;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event handles of the streaming module's event store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStore {
    Create,
    Accept,
    Claim,
    Close,
}

impl EventStore {
    pub fn handle(&self) -> &'static str {
        match self {
            EventStore::Create => "stream_create_events",
            EventStore::Accept => "stream_accept_events",
            EventStore::Claim => "stream_claim_events",
            EventStore::Close => "stream_close_events",
        }
    }

    pub fn all() -> [EventStore; 4] {
        [EventStore::Create, EventStore::Accept, EventStore::Claim, EventStore::Close]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StreamEventKind {
    Created,
    Accepted,
    Claimed,
    Cancelled,
}

impl StreamEventKind {
    /// Match the ledger's fully qualified event type tag
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        if tag.contains("::StreamCreateEvent") {
            Some(StreamEventKind::Created)
        } else if tag.contains("::StreamAcceptEvent") {
            Some(StreamEventKind::Accepted)
        } else if tag.contains("::StreamClaimEvent") {
            Some(StreamEventKind::Claimed)
        } else if tag.contains("::StreamCloseEvent") {
            Some(StreamEventKind::Cancelled)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamEvent {
    pub kind: StreamEventKind,
    pub stream_id: u64,
    pub timestamp_ms: TimestampMs,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    /// Base units; set on create and claim events
    pub amount: Option<u64>,
    /// Base units settled on close
    pub amount_to_sender: Option<u64>,
    pub amount_to_recipient: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    type_tag: String,
    data: RawEventData,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    stream_id: Value,
    timestamp: Value,
    amount: Option<Value>,
    amount_to_sender: Option<Value>,
    amount_to_receiver: Option<Value>,
    sender_address: Option<String>,
    receiver_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventBatch {
    pub events: Vec<StreamEvent>,
    pub skipped: Vec<MalformedEvent>,
}

impl EventBatch {
    pub fn extend(&mut self, other: EventBatch) {
        self.events.extend(other.events);
        self.skipped.extend(other.skipped);
    }
}

/// Decode raw ledger events, skipping the ones that do not parse
pub fn parse_events(raw: &[Value]) -> EventBatch {
    let mut batch = EventBatch::default();

    for (index, value) in raw.iter().enumerate() {
        match decode_event(value) {
            Ok(event) => batch.events.push(event),
            Err(reason) => {
                let err = MalformedEvent { index, reason };
                log::warn!("⚠️  Skipping {}", err);
                batch.skipped.push(err);
            }
        }
    }

    batch
}

fn decode_event(value: &Value) -> Result<StreamEvent, String> {
    let raw = RawEvent::deserialize(value).map_err(|e| e.to_string())?;

    let kind = StreamEventKind::from_type_tag(&raw.type_tag)
        .ok_or_else(|| format!("unknown event type: {}", raw.type_tag))?;
    let stream_id = parse_u64(&raw.data.stream_id).map_err(|e| format!("stream_id: {}", e))?;
    let timestamp_secs = parse_u64(&raw.data.timestamp).map_err(|e| format!("timestamp: {}", e))?;
    let timestamp_ms = timestamp_secs
        .checked_mul(1000)
        .and_then(|ms| i64::try_from(ms).ok())
        .ok_or_else(|| format!("timestamp out of range: {}", timestamp_secs))?;

    Ok(StreamEvent {
        kind,
        stream_id,
        timestamp_ms,
        sender: raw.data.sender_address,
        recipient: raw.data.receiver_address,
        amount: parse_optional(raw.data.amount.as_ref()).map_err(|e| format!("amount: {}", e))?,
        amount_to_sender: parse_optional(raw.data.amount_to_sender.as_ref())
            .map_err(|e| format!("amount_to_sender: {}", e))?,
        amount_to_recipient: parse_optional(raw.data.amount_to_receiver.as_ref())
            .map_err(|e| format!("amount_to_receiver: {}", e))?,
    })
}

fn parse_u64(value: &Value) -> Result<u64, String> {
    match value {
        Value::String(s) => s.trim().parse::<u64>().map_err(|e| format!("{} ({:?})", e, s)),
        Value::Number(n) => n.as_u64().ok_or_else(|| format!("not a u64: {}", n)),
        other => Err(format!("expected an integer, got {}", other)),
    }
}

fn parse_optional(value: Option<&Value>) -> Result<Option<u64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse_u64(v).map(Some),
    }
}

/// Events belonging to one stream, in their original order
pub fn filter_by_stream(events: &[StreamEvent], stream_id: u64) -> Vec<StreamEvent> {
    events
        .iter()
        .filter(|e| e.stream_id == stream_id)
        .cloned()
        .collect()
}

/// Stable sort by timestamp
pub fn sort_by_timestamp(events: &[StreamEvent], order: SortOrder) -> Vec<StreamEvent> {
    let mut sorted = events.to_vec();
    match order {
        SortOrder::Ascending => sorted.sort_by(|a, b| a.timestamp_ms.cmp(&b.timestamp_ms)),
        SortOrder::Descending => sorted.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms)),
    }
    sorted
}

/// History of one stream, ordered by timestamp
pub fn stream_history(events: &[StreamEvent], stream_id: u64, order: SortOrder) -> Vec<StreamEvent> {
    sort_by_timestamp(&filter_by_stream(events, stream_id), order)
}

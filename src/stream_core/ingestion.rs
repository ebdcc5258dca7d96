//! Decoding of ledger view responses into `Stream` records
//!
//! The view functions return five parallel columns:
//!
//! ```text
//! [ [counterparty..], [start_secs..], [duration_secs..], [amount..], [stream_id..] ]
//! ```
//!
//! u64 values arrive as JSON strings; plain JSON numbers are accepted too.
//! Each record is validated field by field and a bad record is skipped on
//! its own, never the whole batch.

use super::error::{IngestError, MalformedStreamRecord, StreamField};
use super::stream::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which side of the stream the queried account is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreamSide {
    /// Account is the sender; the counterparty column holds recipients
    Outgoing,
    /// Account is the recipient; the counterparty column holds senders
    Incoming,
}

#[derive(Debug, Deserialize)]
struct StreamColumns(Vec<Value>, Vec<Value>, Vec<Value>, Vec<Value>, Vec<Value>);

impl StreamColumns {
    /// Longest column; cells missing from shorter columns are reported per record
    fn record_count(&self) -> usize {
        [self.0.len(), self.1.len(), self.2.len(), self.3.len(), self.4.len()]
            .into_iter()
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub streams: Vec<Stream>,
    pub skipped: Vec<MalformedStreamRecord>,
}

/// Decode a view response for `account`
pub fn ingest_view_response(
    response: &Value,
    account: &str,
    side: StreamSide,
) -> Result<IngestReport, IngestError> {
    let columns = StreamColumns::deserialize(response)?;
    let mut report = IngestReport::default();

    for index in 0..columns.record_count() {
        match decode_record(&columns, index, account, side) {
            Ok(stream) => report.streams.push(stream),
            Err(e) => {
                log::warn!("⚠️  Skipping {}", e);
                report.skipped.push(e);
            }
        }
    }

    log::debug!(
        "Ingested {} {:?} streams for {} ({} skipped)",
        report.streams.len(),
        side,
        account,
        report.skipped.len()
    );

    Ok(report)
}

fn decode_record(
    columns: &StreamColumns,
    index: usize,
    account: &str,
    side: StreamSide,
) -> Result<Stream, MalformedStreamRecord> {
    let counterparty = parse_address(columns.0.get(index), index)?;
    let start_secs = parse_u64(columns.1.get(index), index, StreamField::StartTimestamp)?;
    let duration_secs = parse_u64(columns.2.get(index), index, StreamField::Duration)?;
    let total_amount = parse_u64(columns.3.get(index), index, StreamField::Amount)?;
    let stream_id = parse_u64(columns.4.get(index), index, StreamField::StreamId)?;

    let start_timestamp_ms = secs_to_ms(start_secs, columns.1.get(index), index, StreamField::StartTimestamp)?;
    let duration_ms = secs_to_ms(duration_secs, columns.2.get(index), index, StreamField::Duration)?;
    if duration_ms <= 0 {
        return Err(malformed(index, StreamField::Duration, columns.2.get(index), "duration must be > 0"));
    }

    let (sender, recipient) = match side {
        StreamSide::Outgoing => (account.to_string(), counterparty),
        StreamSide::Incoming => (counterparty, account.to_string()),
    };

    Ok(Stream {
        sender,
        recipient,
        total_amount,
        duration_ms,
        start_timestamp_ms,
        stream_id,
    })
}

fn malformed(index: usize, field: StreamField, value: Option<&Value>, reason: &str) -> MalformedStreamRecord {
    MalformedStreamRecord {
        index,
        field,
        value: value.map_or_else(|| "<missing>".to_string(), |v| v.to_string()),
        reason: reason.to_string(),
    }
}

fn parse_address(value: Option<&Value>, index: usize) -> Result<String, MalformedStreamRecord> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(malformed(index, StreamField::Counterparty, value, "empty address")),
        Some(_) => Err(malformed(index, StreamField::Counterparty, value, "expected a string")),
        None => Err(malformed(index, StreamField::Counterparty, value, "missing value")),
    }
}

fn parse_u64(value: Option<&Value>, index: usize, field: StreamField) -> Result<u64, MalformedStreamRecord> {
    match value {
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| malformed(index, field, value, &e.to_string())),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| malformed(index, field, value, "expected a non-negative integer")),
        Some(_) => Err(malformed(index, field, value, "expected an integer string")),
        None => Err(malformed(index, field, value, "missing value")),
    }
}

fn secs_to_ms(
    secs: u64,
    value: Option<&Value>,
    index: usize,
    field: StreamField,
) -> Result<i64, MalformedStreamRecord> {
    secs.checked_mul(1000)
        .and_then(|ms| i64::try_from(ms).ok())
        .ok_or_else(|| malformed(index, field, value, "out of range for milliseconds"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outgoing_columns() {
        let response = json!([
            ["0xbob", "0xcarol"],
            ["1700000000", "0"],
            ["3600", "60"],
            ["150000000", "42"],
            ["2", "5"]
        ]);

        let report = ingest_view_response(&response, "0xalice", StreamSide::Outgoing).unwrap();

        assert!(report.skipped.is_empty());
        assert_eq!(report.streams.len(), 2);

        let first = &report.streams[0];
        assert_eq!(first.sender, "0xalice");
        assert_eq!(first.recipient, "0xbob");
        assert_eq!(first.start_timestamp_ms, 1_700_000_000_000);
        assert_eq!(first.duration_ms, 3_600_000);
        assert_eq!(first.total_amount, 150_000_000);
        assert_eq!(first.stream_id, 2);

        assert!(report.streams[1].is_pending());
    }

    #[test]
    fn test_incoming_swaps_parties() {
        let response = json!([["0xbob"], [0], [60], [100], [1]]);
        let report = ingest_view_response(&response, "0xalice", StreamSide::Incoming).unwrap();

        assert_eq!(report.streams[0].sender, "0xbob");
        assert_eq!(report.streams[0].recipient, "0xalice");
    }

    #[test]
    fn test_malformed_record_is_skipped_alone() {
        let response = json!([
            ["0xbob", "0xcarol", "0xdave"],
            ["0", "0", "0"],
            ["60", "60", "60"],
            ["100", "12abc", "300"],
            ["1", "2", "3"]
        ]);

        let report = ingest_view_response(&response, "0xalice", StreamSide::Outgoing).unwrap();

        let ids: Vec<u64> = report.streams.iter().map(|s| s.stream_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(report.skipped[0].field, StreamField::Amount);
    }

    #[test]
    fn test_zero_duration_is_malformed() {
        let response = json!([["0xbob"], ["100"], ["0"], ["100"], ["1"]]);
        let report = ingest_view_response(&response, "0xalice", StreamSide::Outgoing).unwrap();

        assert!(report.streams.is_empty());
        assert_eq!(report.skipped[0].field, StreamField::Duration);
    }

    #[test]
    fn test_short_column_reports_missing() {
        let response = json!([["0xbob", "0xcarol"], ["0", "0"], ["60", "60"], ["1", "1"], ["1"]]);
        let report = ingest_view_response(&response, "0xalice", StreamSide::Outgoing).unwrap();

        assert_eq!(report.streams.len(), 1);
        assert_eq!(report.skipped[0].field, StreamField::StreamId);
        assert_eq!(report.skipped[0].value, "<missing>");
    }

    #[test]
    fn test_short_counterparty_column_reports_missing() {
        let response = json!([["0xbob"], ["0", "0"], ["60", "60"], ["1", "1"], ["1", "2"]]);
        let report = ingest_view_response(&response, "0xalice", StreamSide::Outgoing).unwrap();

        assert_eq!(report.streams.len() + report.skipped.len(), 2);
        assert_eq!(report.streams[0].stream_id, 1);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(report.skipped[0].field, StreamField::Counterparty);
        assert_eq!(report.skipped[0].value, "<missing>");
    }

    #[test]
    fn test_negative_and_overflowing_values() {
        let response = json!([
            ["0xbob", "0xcarol", ""],
            [-5, "18446744073709551615", "0"],
            ["60", "60", "60"],
            ["1", "1", "1"],
            ["1", "2", "3"]
        ]);
        let report = ingest_view_response(&response, "0xalice", StreamSide::Outgoing).unwrap();

        assert!(report.streams.is_empty());
        let fields: Vec<StreamField> = report.skipped.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![StreamField::StartTimestamp, StreamField::StartTimestamp, StreamField::Counterparty]
        );
    }

    #[test]
    fn test_wrong_shape_is_batch_error() {
        assert!(ingest_view_response(&json!({"error": "nope"}), "0xalice", StreamSide::Outgoing).is_err());
        assert!(ingest_view_response(&json!([[], []]), "0xalice", StreamSide::Outgoing).is_err());
        assert!(ingest_view_response(&json!([[], [], [], [], []]), "0xalice", StreamSide::Outgoing)
            .unwrap()
            .streams
            .is_empty());
    }
}

//! Integration tests for the account monitor against an in-memory ledger
//!
//! Key integration points tested:
//! - Concurrent fetch of both sides of an account
//! - Per-record skipping during ingestion
//! - Net rate from active streams only
//! - Stream history across all four event stores

#[cfg(test)]
mod account_snapshot_tests {
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use streampay::stream_core::{EventStore, Phase, SortOrder, StreamEventKind};
    use streampay::{LedgerError, StreamMonitor, StreamSource};

    const NOW_MS: i64 = 1_700_000_050_000;

    struct FixtureLedger {
        sent: Value,
        received: Value,
        events: HashMap<EventStore, Vec<Value>>,
    }

    #[async_trait]
    impl StreamSource for FixtureLedger {
        async fn senders_streams(&self, _account: &str) -> Result<Value, LedgerError> {
            Ok(self.sent.clone())
        }

        async fn receivers_streams(&self, _account: &str) -> Result<Value, LedgerError> {
            Ok(self.received.clone())
        }

        async fn events(&self, store: EventStore) -> Result<Vec<Value>, LedgerError> {
            Ok(self.events.get(&store).cloned().unwrap_or_default())
        }

        fn source_type(&self) -> &'static str {
            "fixture"
        }
    }

    struct FailingLedger;

    #[async_trait]
    impl StreamSource for FailingLedger {
        async fn senders_streams(&self, _account: &str) -> Result<Value, LedgerError> {
            Ok(json!([[], [], [], [], []]))
        }

        async fn receivers_streams(&self, _account: &str) -> Result<Value, LedgerError> {
            Err(LedgerError::Status(503, "unavailable".to_string()))
        }

        async fn events(&self, _store: EventStore) -> Result<Vec<Value>, LedgerError> {
            Err(LedgerError::MissingResourceAccount)
        }

        fn source_type(&self) -> &'static str {
            "failing"
        }
    }

    fn event(type_name: &str, stream_id: &str, timestamp: &str) -> Value {
        json!({
            "type": format!("0xmod::payments::{}", type_name),
            "data": {"stream_id": stream_id, "timestamp": timestamp, "amount": "100"}
        })
    }

    fn fixture() -> FixtureLedger {
        // Started 50s before NOW_MS, 100s long: active
        let sent = json!([
            ["0xbob", "0xcarol"],
            ["1700000000", "0"],
            ["100", "100"],
            ["40", "999"],
            ["1", "2"]
        ]);
        let received = json!([
            ["0xdave", "0xerin", "0xfrank", "0xgina"],
            ["1700000000", "1600000000", "0", "1700000000"],
            ["100", "100", "100", "100"],
            ["100", "500", "700", "oops"],
            ["3", "4", "5", "6"]
        ]);

        let mut events = HashMap::new();
        events.insert(EventStore::Create, vec![event("StreamCreateEvent", "3", "1699999000"), event("StreamCreateEvent", "4", "1599999000")]);
        events.insert(EventStore::Accept, vec![event("StreamAcceptEvent", "3", "1700000000")]);
        events.insert(EventStore::Claim, vec![event("StreamClaimEvent", "3", "1700000040")]);
        events.insert(EventStore::Close, vec![event("StreamMysteryEvent", "3", "1700000045")]);

        FixtureLedger { sent, received, events }
    }

    #[tokio::test]
    async fn test_snapshot_categorizes_both_sides() {
        let monitor = StreamMonitor::new(fixture());
        let snapshot = monitor.snapshot("0xalice", NOW_MS).await.unwrap();

        assert_eq!(snapshot.outgoing.active.len(), 1);
        assert_eq!(snapshot.outgoing.pending.len(), 1);
        assert_eq!(snapshot.incoming.active.len(), 1);
        assert_eq!(snapshot.incoming.completed.len(), 1);
        assert_eq!(snapshot.incoming.pending.len(), 1);

        // 100/100s in, 40/100s out; the pending 700 and completed 500 do not count
        assert!((snapshot.net_rate - 0.6).abs() < 1e-12, "got {}", snapshot.net_rate);
    }

    #[tokio::test]
    async fn test_malformed_record_skipped_not_batch() {
        let monitor = StreamMonitor::new(fixture());
        let book = monitor.fetch_account("0xalice").await.unwrap();

        assert_eq!(book.incoming.len(), 3);
        assert_eq!(book.skipped.len(), 1);
        assert_eq!(book.skipped[0].index, 3);
        assert!(book.incoming.iter().all(|s| s.recipient == "0xalice"));
        assert!(book.outgoing.iter().all(|s| s.sender == "0xalice"));
    }

    #[tokio::test]
    async fn test_book_re_evaluates_without_refetch() {
        let monitor = StreamMonitor::new(fixture());
        let book = monitor.fetch_account("0xalice").await.unwrap();

        let later = book.evaluate(NOW_MS + 60_000);
        assert_eq!(later.incoming.active.len(), 0);
        assert_eq!(later.net_rate, 0.0);

        let stream = &book.incoming[0];
        let v = streampay::stream_core::evaluate(stream, NOW_MS).unwrap();
        assert_eq!(v.phase, Phase::Active);
        assert_eq!(v.released_amount, 50);
    }

    #[tokio::test]
    async fn test_stream_history_across_stores() {
        let monitor = StreamMonitor::new(fixture());
        let history = monitor.stream_history(3, SortOrder::Ascending).await.unwrap();

        let kinds: Vec<StreamEventKind> = history.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![StreamEventKind::Created, StreamEventKind::Accepted, StreamEventKind::Claimed]
        );

        let latest_first = monitor.stream_history(3, SortOrder::Descending).await.unwrap();
        assert_eq!(latest_first[0].kind, StreamEventKind::Claimed);
    }

    #[tokio::test]
    async fn test_ledger_errors_propagate() {
        let monitor = StreamMonitor::new(FailingLedger);

        let err = monitor.fetch_account("0xalice").await.unwrap_err();
        assert!(matches!(err, LedgerError::Status(503, _)));

        let err = monitor.stream_history(1, SortOrder::Ascending).await.unwrap_err();
        assert!(matches!(err, LedgerError::MissingResourceAccount));
    }
}

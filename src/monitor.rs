//! Account monitor: fetches an account's stream book and evaluates it
//!
//! Fetching and evaluation are separate. `fetch_account` talks to the ledger;
//! `AccountStreams::evaluate` is pure and can be re-run against a new clock
//! reading as often as the caller likes.

use crate::ledger::{LedgerError, StreamSource};
use crate::stream_core::{
    categorize, events, ingest_view_response, net_rate_of, sort, CategorizedStreams, EventBatch,
    EventStore, MalformedStreamRecord, SortKey, SortOrder, Stream, StreamEvent, StreamSide,
    TimestampMs,
};
use serde::Serialize;

/// Streams of one account as last fetched from the ledger
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountStreams {
    pub account: String,
    pub outgoing: Vec<Stream>,
    pub incoming: Vec<Stream>,
    /// Records dropped during ingestion, both sides
    pub skipped: Vec<MalformedStreamRecord>,
}

/// Evaluated view of an account's streams at one instant
#[derive(Debug, Clone, Serialize)]
pub struct AccountSnapshot {
    pub evaluated_at_ms: TimestampMs,
    pub outgoing: CategorizedStreams,
    pub incoming: CategorizedStreams,
    /// Base units per second, incoming minus outgoing
    pub net_rate: f64,
}

impl AccountStreams {
    pub fn evaluate(&self, now: TimestampMs) -> AccountSnapshot {
        let outgoing = categorize(&self.outgoing, now);
        let incoming = categorize(&self.incoming, now);
        let net_rate = net_rate_of(&incoming, &outgoing);

        AccountSnapshot {
            evaluated_at_ms: now,
            outgoing,
            incoming,
            net_rate,
        }
    }

    /// Outgoing streams in display order
    pub fn sorted_outgoing(&self, key: SortKey, now: TimestampMs) -> Vec<Stream> {
        sort(&self.outgoing, key, now)
    }

    /// Incoming streams in display order
    pub fn sorted_incoming(&self, key: SortKey, now: TimestampMs) -> Vec<Stream> {
        sort(&self.incoming, key, now)
    }
}

pub struct StreamMonitor<S: StreamSource> {
    source: S,
}

impl<S: StreamSource> StreamMonitor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch both sides of `account` concurrently and decode them
    pub async fn fetch_account(&self, account: &str) -> Result<AccountStreams, LedgerError> {
        let (sent, received) = tokio::try_join!(
            self.source.senders_streams(account),
            self.source.receivers_streams(account),
        )?;

        let outgoing = ingest_view_response(&sent, account, StreamSide::Outgoing)?;
        let incoming = ingest_view_response(&received, account, StreamSide::Incoming)?;

        log::info!(
            "📥 Fetched {} outgoing / {} incoming streams for {} via {}",
            outgoing.streams.len(),
            incoming.streams.len(),
            account,
            self.source.source_type()
        );

        let mut skipped = outgoing.skipped;
        skipped.extend(incoming.skipped);

        Ok(AccountStreams {
            account: account.to_string(),
            outgoing: outgoing.streams,
            incoming: incoming.streams,
            skipped,
        })
    }

    /// Fetch and evaluate in one step
    pub async fn snapshot(&self, account: &str, now: TimestampMs) -> Result<AccountSnapshot, LedgerError> {
        Ok(self.fetch_account(account).await?.evaluate(now))
    }

    /// Event history of one stream across all four event stores
    pub async fn stream_history(&self, stream_id: u64, order: SortOrder) -> Result<Vec<StreamEvent>, LedgerError> {
        let [create, accept, claim, close] = EventStore::all();
        let (created, accepted, claimed, closed) = tokio::try_join!(
            self.source.events(create),
            self.source.events(accept),
            self.source.events(claim),
            self.source.events(close),
        )?;

        let mut batch = EventBatch::default();
        for raw in [created, accepted, claimed, closed] {
            batch.extend(events::parse_events(&raw));
        }

        if !batch.skipped.is_empty() {
            log::warn!("⚠️  {} events could not be decoded", batch.skipped.len());
        }

        Ok(events::stream_history(&batch.events, stream_id, order))
    }
}

//! Source trait for ledger stream data
//!
//! Defines the interface the monitor fetches through, so the ledger REST
//! client can be swapped for a fixture in tests.

use crate::stream_core::{EventStore, IngestError};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug)]
pub enum LedgerError {
    Http(reqwest::Error),
    Status(u16, String),
    Decode(serde_json::Error),
    Ingest(IngestError),
    UnexpectedResponse(String),
    MissingResourceAccount,
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::Http(err)
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Decode(err)
    }
}

impl From<IngestError> for LedgerError {
    fn from(err: IngestError) -> Self {
        LedgerError::Ingest(err)
    }
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Http(e) => write!(f, "HTTP error: {}", e),
            LedgerError::Status(code, body) => write!(f, "Ledger API error {}: {}", code, body),
            LedgerError::Decode(e) => write!(f, "Decode error: {}", e),
            LedgerError::Ingest(e) => write!(f, "Ingest error: {}", e),
            LedgerError::UnexpectedResponse(msg) => write!(f, "Unexpected ledger response: {}", msg),
            LedgerError::MissingResourceAccount => {
                write!(f, "RESOURCE_ACCOUNT_ADDRESS is required to read stream events")
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Raw stream data as the ledger returns it
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// View response of streams sent by `account`
    async fn senders_streams(&self, account: &str) -> Result<Value, LedgerError>;

    /// View response of streams received by `account`
    async fn receivers_streams(&self, account: &str) -> Result<Value, LedgerError>;

    /// Raw events of one module event store
    async fn events(&self, store: EventStore) -> Result<Vec<Value>, LedgerError>;

    /// Source type for logging
    fn source_type(&self) -> &'static str;
}

//! Ledger access: the `StreamSource` seam and its REST implementation

pub mod source;
pub mod view_client;

pub use source::{LedgerError, StreamSource};
pub use view_client::{ViewClient, ViewFunction, ViewRequest};

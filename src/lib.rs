
pub mod config;
pub mod ledger;
pub mod monitor;
pub mod stream_core;

pub use config::{Config, ConfigError, LedgerConfig};
pub use ledger::{LedgerError, StreamSource, ViewClient};
pub use monitor::{AccountSnapshot, AccountStreams, StreamMonitor};

//! Stream Monitor Binary - follows one account's payment streams
//!
//! Fetches the account's outgoing and incoming streams from the ledger view
//! API, then re-evaluates the cached book against the clock between fetches.
//! Read-only: it never signs or submits transactions.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin stream_monitor
//! cargo run --release --bin stream_monitor -- --history 12
//! ```
//!
//! ## Environment Variables
//!
//! - ACCOUNT_ADDRESS - Account to follow (required)
//! - MODULE_ADDRESS / MODULE_NAME - Streaming module coordinates (required)
//! - LEDGER_API_URL - Ledger REST API (default: Aptos testnet fullnode)
//! - RESOURCE_ACCOUNT_ADDRESS - Event store owner (required for --history)
//! - FETCH_INTERVAL_SECS - How often to refetch streams (default: 30)
//! - REFRESH_INTERVAL_MS - How often to re-evaluate the cached book (default: 1000)
//! - SORT_KEY - Display order, e.g. "Oldest" (default: "Most Recent")
//! - RUST_LOG - Logging level (optional, default: info)

use std::env;
use streampay::config::{Config, ConfigError};
use streampay::stream_core::display::{format_base_rate, format_duration_short, format_end_date, shorten_address};
use streampay::stream_core::{current_timestamp_ms, evaluate, SortOrder, Stream, StreamSide, TimestampMs};
use streampay::{AccountStreams, StreamMonitor, ViewClient};
use tokio::time::{interval, Duration, MissedTickBehavior};

fn parse_history_from_args() -> Option<u64> {
    let args: Vec<String> = env::args().collect();
    let idx = args.iter().position(|x| x == "--history")?;
    args.get(idx + 1).and_then(|s| s.parse().ok())
}

fn log_stream(stream: &Stream, side: StreamSide, now: TimestampMs, symbol: &str) {
    let counterparty = match side {
        StreamSide::Outgoing => &stream.recipient,
        StreamSide::Incoming => &stream.sender,
    };

    match evaluate(stream, now) {
        Ok(v) => log::info!(
            "   #{:<4} {:<8} {:<13} released {:.8} / {:.8} {} | ends {} | {}",
            stream.stream_id,
            v.phase.as_str(),
            shorten_address(counterparty),
            v.released_display(),
            stream.total_display(),
            symbol,
            format_end_date(stream).unwrap_or_else(|| "not started".to_string()),
            format_duration_short(stream.duration_ms),
        ),
        Err(e) => log::warn!("   #{:<4} {}", stream.stream_id, e),
    }
}

fn log_book(book: &AccountStreams, config: &Config, now: TimestampMs) {
    let snapshot = book.evaluate(now);

    log::info!(
        "📊 {} | net rate {} | outgoing {}p/{}a/{}c | incoming {}p/{}a/{}c",
        shorten_address(&book.account),
        format_base_rate(snapshot.net_rate, &config.currency_symbol),
        snapshot.outgoing.pending.len(),
        snapshot.outgoing.active.len(),
        snapshot.outgoing.completed.len(),
        snapshot.incoming.pending.len(),
        snapshot.incoming.active.len(),
        snapshot.incoming.completed.len(),
    );

    log::info!("   Outgoing ({}):", config.sort_key.as_str());
    for stream in book.sorted_outgoing(config.sort_key, now) {
        log_stream(&stream, StreamSide::Outgoing, now, &config.currency_symbol);
    }

    log::info!("   Incoming ({}):", config.sort_key.as_str());
    for stream in book.sorted_incoming(config.sort_key, now) {
        log_stream(&stream, StreamSide::Incoming, now, &config.currency_symbol);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.rust_log))
        .target(env_logger::Target::Stderr)
        .init();

    let account = config
        .account_address
        .clone()
        .ok_or_else(|| ConfigError::MissingVariable("ACCOUNT_ADDRESS".to_string()))?;

    log::info!("🚀 Starting Stream Monitor");
    log::info!("   Ledger API: {}", config.ledger.api_url);
    log::info!("   Module: {}::{}", config.ledger.module_address, config.ledger.module_name);
    log::info!("   Account: {}", account);
    log::info!("   Fetch interval: {}s", config.fetch_interval_secs);
    log::info!("   Refresh interval: {}ms", config.refresh_interval_ms);
    log::info!("   Sort: {}", config.sort_key.as_str());

    let monitor = StreamMonitor::new(ViewClient::new(config.ledger.clone())?);

    if let Some(stream_id) = parse_history_from_args() {
        let history = monitor.stream_history(stream_id, SortOrder::Ascending).await?;
        log::info!("📜 History of stream {} ({} events)", stream_id, history.len());
        for event in history {
            log::info!(
                "   {:?} at {} amount={:?} to_sender={:?} to_recipient={:?}",
                event.kind,
                event.timestamp_ms,
                event.amount,
                event.amount_to_sender,
                event.amount_to_recipient,
            );
        }
        return Ok(());
    }

    let mut fetch_timer = interval(Duration::from_secs(config.fetch_interval_secs));
    let mut refresh_timer = interval(Duration::from_millis(config.refresh_interval_ms));
    refresh_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut book: Option<AccountStreams> = None;

    loop {
        tokio::select! {
            _ = fetch_timer.tick() => {
                match monitor.fetch_account(&account).await {
                    Ok(fetched) => {
                        if !fetched.skipped.is_empty() {
                            log::warn!("⚠️  {} stream records skipped", fetched.skipped.len());
                        }
                        log_book(&fetched, &config, current_timestamp_ms());
                        book = Some(fetched);
                    }
                    Err(e) => log::error!("❌ Fetch failed, keeping previous book: {}", e),
                }
            }
            _ = refresh_timer.tick() => {
                if let Some(ref book) = book {
                    let snapshot = book.evaluate(current_timestamp_ms());
                    log::debug!(
                        "🔄 net rate {} ({} active incoming, {} active outgoing)",
                        format_base_rate(snapshot.net_rate, &config.currency_symbol),
                        snapshot.incoming.active.len(),
                        snapshot.outgoing.active.len(),
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("🛑 Shutting down");
                break;
            }
        }
    }

    Ok(())
}

//! Stream ordering for the payments list

use super::stream::{Stream, TimestampMs};
use super::valuation::evaluate;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    MostRecent,
    Oldest,
    EndDateCloseToFar,
    EndDateFarToClose,
    TotalAmountLowToHigh,
    TotalAmountHighToLow,
    ClaimableAmountHighToLow,
    ClaimableAmountLowToHigh,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::MostRecent => "Most Recent",
            SortKey::Oldest => "Oldest",
            SortKey::EndDateCloseToFar => "End Date - Close to Far",
            SortKey::EndDateFarToClose => "End Date - Far to Close",
            SortKey::TotalAmountLowToHigh => "Total Amount - Low to High",
            SortKey::TotalAmountHighToLow => "Total Amount - High to Low",
            SortKey::ClaimableAmountHighToLow => "Claimable Amount - High to Low",
            SortKey::ClaimableAmountLowToHigh => "Claimable Amount - Low to High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|key| key.as_str() == s)
    }

    /// Parse a sort label, falling back to `MostRecent` for anything unknown
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("⚠️  Unsupported sort key '{}', using '{}'", s, SortKey::MostRecent.as_str());
            SortKey::MostRecent
        })
    }

    pub fn all() -> [SortKey; 8] {
        [
            SortKey::MostRecent,
            SortKey::Oldest,
            SortKey::EndDateCloseToFar,
            SortKey::EndDateFarToClose,
            SortKey::TotalAmountLowToHigh,
            SortKey::TotalAmountHighToLow,
            SortKey::ClaimableAmountHighToLow,
            SortKey::ClaimableAmountLowToHigh,
        ]
    }

    fn is_descending(&self) -> bool {
        matches!(
            self,
            SortKey::MostRecent
                | SortKey::EndDateFarToClose
                | SortKey::TotalAmountHighToLow
                | SortKey::ClaimableAmountHighToLow
        )
    }
}

/// Sort value of a stream under a key. `None` when the stream cannot be valued.
fn sort_value(stream: &Stream, key: SortKey, now: TimestampMs) -> Option<i128> {
    match key {
        SortKey::MostRecent | SortKey::Oldest => Some(stream.stream_id as i128),
        SortKey::TotalAmountHighToLow | SortKey::TotalAmountLowToHigh => {
            Some(stream.total_amount as i128)
        }
        SortKey::EndDateFarToClose | SortKey::EndDateCloseToFar => {
            Some(stream.end_timestamp_ms() as i128)
        }
        SortKey::ClaimableAmountHighToLow | SortKey::ClaimableAmountLowToHigh => {
            match evaluate(stream, now) {
                Ok(v) => Some(v.remaining_amount as i128),
                Err(e) => {
                    log::warn!("⚠️  Sorting stream {} last: {}", stream.stream_id, e);
                    None
                }
            }
        }
    }
}

/// Return a new ordering of `streams` under `key`.
///
/// Ties fall back to `stream_id` ascending. Streams that cannot be valued go
/// last under the claimable-amount keys.
pub fn sort(streams: &[Stream], key: SortKey, now: TimestampMs) -> Vec<Stream> {
    let mut keyed: Vec<(Option<i128>, &Stream)> = streams
        .iter()
        .map(|s| (sort_value(s, key, now), s))
        .collect();

    keyed.sort_by(|(va, a), (vb, b)| {
        let primary = match (va, vb) {
            (Some(x), Some(y)) if key.is_descending() => y.cmp(x),
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        primary.then(a.stream_id.cmp(&b.stream_id))
    });

    keyed.into_iter().map(|(_, s)| s.clone()).collect()
}

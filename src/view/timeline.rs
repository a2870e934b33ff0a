//! Chronological reduction of a log stream.
//!
//! The timeline view collapses a fact stream into one event per
//! transaction. The source must be transaction-contiguous, which log order
//! guarantees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::stream::{group_by, FactStream, GroupStream};

/// Chronological ordering of timeline events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Oldest transaction first.
    Ascending,
    /// Newest transaction first.
    Descending,
}

/// One committed transaction as seen by the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Transaction id.
    pub transaction: u64,

    /// Commit time carried by the transaction's facts.
    pub time: DateTime<Utc>,

    /// Number of facts in the transaction.
    pub count: usize,
}

/// Reduces the stream to transaction events, ordered by `direction`.
///
/// # Errors
///
/// Returns the stream's terminal error, if any.
pub fn timeline<S: FactStream>(stream: S, direction: Direction) -> Result<Vec<Event>> {
    let mut groups = group_by(stream, |a, b| a.transaction == b.transaction);
    let mut events = Vec::new();

    while let Some(group) = groups.next() {
        // Groups are never empty.
        let first = &group[0];
        events.push(Event {
            transaction: first.transaction,
            time: first.time,
            count: group.len(),
        });
    }

    if let Some(err) = groups.err() {
        return Err(err);
    }

    // Log order may run either way along the chain; normalise on the
    // transaction id, which is monotonic per store.
    events.sort_by_key(|event| event.transaction);

    if direction == Direction::Descending {
        events.reverse();
    }

    Ok(events)
}

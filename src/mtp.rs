//! Median-time-past: the lower bound a new header's timestamp must clear.

use crate::constants::MEDIAN_TIMESPAN;
use crate::header::{Entry, Hash};
use std::collections::HashMap;

/// Median of up to [`MEDIAN_TIMESPAN`] ancestor timestamps starting at
/// `prev` (inclusive) and walking `prev_block` pointers through `hashes`.
///
/// Returns `0` if `prev` is `None` (there is no predecessor to derive an
/// MTP from - only reachable before genesis exists).
pub fn median_time_past(hashes: &HashMap<Hash, Entry>, prev: Option<&Entry>) -> u64 {
    let Some(mut cursor) = prev else {
        return 0;
    };

    let mut timestamps = Vec::with_capacity(MEDIAN_TIMESPAN);
    loop {
        timestamps.push(cursor.header.time);
        if timestamps.len() == MEDIAN_TIMESPAN {
            break;
        }
        match hashes.get(&cursor.header.prev_block) {
            Some(parent) => cursor = parent,
            None => break,
        }
    }

    timestamps.sort_unstable();
    timestamps[timestamps.len() / 2]
}

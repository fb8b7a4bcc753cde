//! Sliding-window difficulty retargeting.
//!
//! Ported from the teacher's `pow.rs::get_next_work_required` idea
//! (single-endpoint timespan ratio) generalized into the windowed,
//! MTP-damped algorithm the original C chain actually implements
//! (`hsk_chain_retarget` in `chain.c`): average the target over the last
//! `target_window` ancestors rather than comparing two endpoints, and damp
//! the observed timespan by a quarter before applying it, so a handful of
//! manipulated timestamps can't swing difficulty on their own.

use std::collections::HashMap;

use crate::bigint::BigInt256;
use crate::compact;
use crate::constants::Params;
use crate::header::{Entry, Hash};
use crate::mtp::median_time_past;

/// Computes the `bits` a header extending `prev` must carry, ignoring the
/// network-mode policy exemptions in [`crate::validator::target_for`] (this
/// function is always the windowed-average path; `target_for` layers the
/// `NO_RETARGETTING`/`TARGET_RESET` special cases on top of it).
pub fn retarget(hashes: &HashMap<Hash, Entry>, prev: &Entry, params: &Params) -> u32 {
    let mut sum = BigInt256::ZERO;
    let mut cursor = prev;
    let mut count = 0u32;
    let mut first = prev;

    loop {
        let Some(target) = cursor.header.target() else {
            // A stored header always has a canonical `bits` (validated on
            // the way in); this is unreachable for real chain state.
            return params.hsk_bits;
        };
        sum = sum.add(&target);
        first = cursor;
        count += 1;

        if count == params.target_window {
            break;
        }

        match hashes.get(&cursor.header.prev_block) {
            Some(parent) => cursor = parent,
            None => return params.hsk_bits,
        }
    }

    let average = sum.div_u32(params.target_window);

    // `first` is the oldest *summed* header, at depth target_window-1 below
    // `prev`. The anchor for `start` is one step further back than that -
    // matching `hsk_chain_retarget`, which keeps walking `first` past the
    // summation loop before taking its MTP. If that ancestor doesn't exist
    // (chain is exactly `target_window` long), fall back to the default.
    let Some(start_anchor) = hashes.get(&first.header.prev_block) else {
        return params.hsk_bits;
    };

    let start = median_time_past(hashes, Some(start_anchor));
    let end = median_time_past(hashes, Some(prev));
    let diff = end as i64 - start as i64;

    let mut actual = params.target_timespan + (diff - params.target_timespan) / 4;
    actual = actual.clamp(params.min_actual, params.max_actual);

    let new_target = average.mul_u32(actual as u32).div_u32(params.target_timespan as u32);

    let limit = BigInt256::from_be_bytes(&params.pow_limit);
    if new_target > limit {
        return params.hsk_bits;
    }

    compact::to_bits(&new_target.to_be_bytes())
}

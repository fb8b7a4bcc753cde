//! Block locators: a compact summary of the chain a peer can send so the
//! other side can find the fork point without walking every hash (§4.9).

use crate::constants::MAX_LOCATOR_HASHES;
use crate::header::Hash;
use crate::index::ChainIndex;

/// An ordered list of hashes, tip-first, with exponentially increasing gaps
/// further back - the same step-then-double shape `getblocks`-style locators
/// use everywhere in this corpus. Always ends in genesis if the list reaches
/// [`MAX_LOCATOR_HASHES`] entries before getting there on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator(Vec<Hash>);

impl Locator {
    /// The hashes, tip-first.
    pub fn hashes(&self) -> &[Hash] {
        &self.0
    }

    /// Number of hashes carried.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the locator is empty (never true for one built from a
    /// non-empty index - kept for the common `is_empty` idiom).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds a locator starting at the current tip: the first 10 entries step
/// back one height at a time, then the step doubles each entry after that,
/// until height 0 (genesis) is included or [`MAX_LOCATOR_HASHES`] entries
/// have been collected, whichever comes first.
pub fn build(index: &ChainIndex) -> Locator {
    let mut hashes = Vec::with_capacity(MAX_LOCATOR_HASHES);
    let mut height = index.height() as i64;
    let mut step: i64 = 1;
    let mut collected = 0u32;

    loop {
        let entry = index
            .get_by_height(height as u32)
            .expect("every height below the tip is on the main chain");
        hashes.push(entry.hash);
        collected += 1;

        if height == 0 {
            break;
        }

        if collected as usize + 1 == MAX_LOCATOR_HASHES {
            // One slot left: force it to land on genesis.
            height = 0;
            continue;
        }

        if collected >= 10 {
            step *= 2;
        }

        height = (height - step).max(0);

        if hashes.len() == MAX_LOCATOR_HASHES {
            break;
        }
    }

    Locator(hashes)
}

//! The chain's four lookup maps and the invariants they jointly maintain.

use std::collections::{BTreeMap, HashMap};

use crate::header::{Entry, Hash, Header};

/// Owns every header the chain has ever accepted (main chain, alternate
/// branches, and orphans) and the indexes needed to find them again.
///
/// `heights` and `prevs` store only the 32-byte hash of the entry they
/// point at - never a second owning copy - matching the spec's description
/// of them as non-owning indexes into `hashes`/`orphans`. `tip` and
/// `genesis` are represented the same way and re-resolved against `hashes`
/// on every access, which is the Rust rendition of "must be invalidated or
/// re-read after any mutation."
#[derive(Debug)]
pub struct ChainIndex {
    hashes: HashMap<Hash, Entry>,
    heights: BTreeMap<u32, Hash>,
    orphans: HashMap<Hash, Entry>,
    prevs: HashMap<Hash, Hash>,
    tip: Hash,
    genesis: Hash,
}

impl ChainIndex {
    /// Builds a fresh index rooted at `genesis`. `genesis.header.prev_block`
    /// is not consulted - by construction, genesis has no predecessor.
    pub fn new(genesis: Entry) -> Self {
        let hash = genesis.hash;
        let mut hashes = HashMap::new();
        let mut heights = BTreeMap::new();
        hashes.insert(hash, genesis);
        heights.insert(0, hash);
        ChainIndex {
            hashes,
            heights,
            orphans: HashMap::new(),
            prevs: HashMap::new(),
            tip: hash,
            genesis: hash,
        }
    }

    /// The current main-chain tip.
    pub fn tip(&self) -> &Entry {
        self.hashes
            .get(&self.tip)
            .expect("tip hash always resolves to a stored entry")
    }

    /// The immutable genesis entry.
    pub fn genesis(&self) -> &Entry {
        self.hashes
            .get(&self.genesis)
            .expect("genesis hash always resolves to a stored entry")
    }

    /// Height of the current tip.
    pub fn height(&self) -> u32 {
        self.tip().height
    }

    /// Looks up any known header (main chain or alternate branch) by hash.
    pub fn get(&self, hash: &Hash) -> Option<&Entry> {
        self.hashes.get(hash)
    }

    /// Looks up the main-chain header at `height`, if any.
    pub fn get_by_height(&self, height: u32) -> Option<&Entry> {
        self.heights.get(&height).and_then(|hash| self.hashes.get(hash))
    }

    /// Whether `hash` is known at all (main chain, alternate branch, or orphan).
    pub fn is_known(&self, hash: &Hash) -> bool {
        self.hashes.contains_key(hash) || self.orphans.contains_key(hash)
    }

    /// Whether `hash` is specifically a duplicate of an already-indexed
    /// (non-orphan) header.
    pub fn contains(&self, hash: &Hash) -> bool {
        self.hashes.contains_key(hash)
    }

    /// Whether `hash` is queued as an orphan.
    pub fn is_orphan(&self, hash: &Hash) -> bool {
        self.orphans.contains_key(hash)
    }

    /// Looks up an orphan by its own hash.
    pub fn get_orphan(&self, hash: &Hash) -> Option<&Entry> {
        self.orphans.get(hash)
    }

    /// Looks up the (most recently arrived) orphan waiting on `prev_block`.
    pub fn orphan_waiting_on(&self, prev_block: &Hash) -> Option<&Entry> {
        self.prevs.get(prev_block).and_then(|hash| self.orphans.get(hash))
    }

    /// Direct read access to the by-hash map, for components (retarget,
    /// MTP) that walk ancestor chains.
    pub fn hashes(&self) -> &HashMap<Hash, Entry> {
        &self.hashes
    }

    /// Files `entry` as an orphan: its parent is not yet known.
    pub fn insert_orphan(&mut self, entry: Entry) {
        let hash = entry.hash;
        let prev_block = entry.header.prev_block;
        self.orphans.insert(hash, entry);
        self.prevs.insert(prev_block, hash);
    }

    /// Removes and returns the orphan queued for `prev_block`, if any.
    pub fn take_orphan_waiting_on(&mut self, prev_block: &Hash) -> Option<Entry> {
        let hash = self.prevs.remove(prev_block)?;
        self.orphans.remove(&hash)
    }

    /// Inserts `entry` into the by-hash map without touching `heights` or
    /// `tip` - used for headers that land on an alternate branch.
    pub fn insert_alternate(&mut self, entry: Entry) {
        self.hashes.insert(entry.hash, entry);
    }

    /// Inserts `entry` as the new main-chain tip at its own height,
    /// updating `heights` and `tip` together.
    pub fn insert_tip(&mut self, entry: Entry) {
        let hash = entry.hash;
        let height = entry.height;
        self.hashes.insert(hash, entry);
        self.heights.insert(height, hash);
        self.tip = hash;
    }

    /// Removes `height` from the main-chain index without touching `hashes`
    /// - the header itself is retained as an alternate-branch member.
    pub fn disconnect_height(&mut self, height: u32) {
        self.heights.remove(&height);
    }

    /// Inserts `hash` into the main-chain index at `height`, without
    /// touching `tip` - used by the fork resolver while splicing in the
    /// winning branch below its own topmost header.
    pub fn connect_height(&mut self, height: u32, hash: Hash) {
        self.heights.insert(height, hash);
    }

    /// Sets `tip` directly. Used once, by the fork resolver, after the
    /// winning branch has been spliced into `heights`.
    pub fn set_tip(&mut self, hash: Hash) {
        self.tip = hash;
    }

    /// Constructs the `Entry` a freshly-validated candidate `header` should
    /// become: computed height, cumulative work, and cached hash.
    pub fn build_entry(header: Header, hash: Hash, height: u32, work: Hash) -> Entry {
        Entry {
            header,
            hash,
            height,
            work,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis_entry() -> Entry {
        let header = Header {
            version: 1,
            prev_block: [0; 32],
            merkle_root: [0; 32],
            witness_root: [0; 32],
            tree_root: [0; 32],
            reserved_root: [0; 32],
            time: 0,
            bits: 0x2000_ffff,
            nonce: 0,
            solution: vec![],
        };
        Entry {
            hash: header.hash(),
            header,
            height: 0,
            work: [0; 32],
        }
    }

    #[test]
    fn new_index_has_genesis_as_tip() {
        let genesis = genesis_entry();
        let index = ChainIndex::new(genesis.clone());
        assert_eq!(index.tip().hash, genesis.hash);
        assert_eq!(index.genesis().hash, genesis.hash);
        assert_eq!(index.height(), 0);
        assert_eq!(index.get_by_height(0).unwrap().hash, genesis.hash);
    }

    #[test]
    fn orphan_round_trips_through_prevs() {
        let genesis = genesis_entry();
        let mut index = ChainIndex::new(genesis);
        let orphan_header = Header {
            version: 1,
            prev_block: [9; 32],
            merkle_root: [0; 32],
            witness_root: [0; 32],
            tree_root: [0; 32],
            reserved_root: [0; 32],
            time: 1,
            bits: 0x2000_ffff,
            nonce: 0,
            solution: vec![],
        };
        let orphan_hash = orphan_header.hash();
        let orphan = Entry {
            header: orphan_header,
            hash: orphan_hash,
            height: 0,
            work: [0; 32],
        };
        index.insert_orphan(orphan);
        assert!(index.is_orphan(&orphan_hash));
        assert_eq!(index.orphan_waiting_on(&[9; 32]).unwrap().hash, orphan_hash);

        let taken = index.take_orphan_waiting_on(&[9; 32]).unwrap();
        assert_eq!(taken.hash, orphan_hash);
        assert!(!index.is_orphan(&orphan_hash));
    }

    #[test]
    fn disconnect_then_connect_changes_height_mapping() {
        let genesis = genesis_entry();
        let mut index = ChainIndex::new(genesis);
        let header = Header {
            version: 1,
            prev_block: index.genesis().hash,
            merkle_root: [0; 32],
            witness_root: [0; 32],
            tree_root: [0; 32],
            reserved_root: [0; 32],
            time: 1,
            bits: 0x2000_ffff,
            nonce: 0,
            solution: vec![],
        };
        let hash = header.hash();
        let entry = Entry {
            header,
            hash,
            height: 1,
            work: [0; 32],
        };
        index.insert_tip(entry);
        assert_eq!(index.get_by_height(1).unwrap().hash, hash);

        index.disconnect_height(1);
        assert!(index.get_by_height(1).is_none());
        assert!(index.contains(&hash), "header stays in `hashes` after disconnect");

        index.connect_height(1, hash);
        assert_eq!(index.get_by_height(1).unwrap().hash, hash);
    }
}

//! Fork resolution: finding the common ancestor and splicing the winning
//! branch onto the main chain (§4.8).
//!
//! The source mutates a `next` field on stored header records to build the
//! disconnect/connect lists in place. This crate instead collects two local
//! `Vec<Hash>`s - built here and dropped at the end of this call - so
//! `Header`/`Entry` never carry scratch state, and the resolver can
//! validate both lists exist in full *before* mutating `heights` at all
//! (closing the atomicity gap the source left as an open question).

use crate::error::ChainError;
use crate::header::Hash;
use crate::index::ChainIndex;

/// The effect of a successful reorg: which heights were vacated, and which
/// hashes now occupy the spliced-in range, for the caller to log or report.
pub struct Reorg {
    /// Heights (and their old occupants) removed from the main chain,
    /// tip-downward.
    pub disconnected: Vec<(u32, Hash)>,
    /// Heights (and their new occupants) added to the main chain,
    /// fork-upward, including the new tip.
    pub connected: Vec<(u32, Hash)>,
}

/// Finds the lowest common ancestor of the current tip and `candidate`,
/// then disconnects the old main chain down to it and connects the new
/// branch up to (but not including) `candidate` itself - the caller
/// inserts `candidate` as the new tip once this returns.
///
/// Requires `candidate`'s entire branch, down to the fork point, to already
/// be present in `index` (true for any header that reached `ForkResolver`
/// through `ChainEngine::add`, since every header on a branch is retained
/// in `hashes` whether or not it's on the main chain).
pub fn reorganize(index: &mut ChainIndex, candidate_prev: Hash) -> Result<Reorg, ChainError> {
    let fork_hash = find_fork(index, index.tip().hash, candidate_prev)?;
    let fork_height = index.get(&fork_hash).expect("fork hash is known").height;

    let mut disconnected = Vec::new();
    let mut cursor = index.tip().hash;
    while cursor != fork_hash {
        let entry = index.get(&cursor).expect("main chain entries are retained");
        disconnected.push((entry.height, entry.hash));
        cursor = entry.header.prev_block;
    }

    let mut connected = Vec::new();
    let mut cursor = candidate_prev;
    while cursor != fork_hash {
        let entry = index.get(&cursor).expect("branch entries are retained");
        connected.push((entry.height, entry.hash));
        cursor = entry.header.prev_block;
    }
    connected.reverse();

    for (height, _) in &disconnected {
        index.disconnect_height(*height);
    }
    for (height, hash) in &connected {
        index.connect_height(*height, *hash);
    }

    let _ = fork_height;
    Ok(Reorg {
        disconnected,
        connected,
    })
}

/// Walks both branches back to their lowest common ancestor by height,
/// then in lockstep, the way `hsk_chain_find_fork` does in the original.
fn find_fork(index: &ChainIndex, mut a: Hash, mut b: Hash) -> Result<Hash, ChainError> {
    loop {
        let entry_a = index.get(&a).ok_or(ChainError::ForkNotFound)?;
        let entry_b = index.get(&b).ok_or(ChainError::ForkNotFound)?;

        if a == b {
            return Ok(a);
        }

        if entry_b.height > entry_a.height {
            b = entry_b.header.prev_block;
            continue;
        }

        if entry_a.height > entry_b.height {
            a = entry_a.header.prev_block;
            continue;
        }

        a = entry_a.header.prev_block;
        b = entry_b.header.prev_block;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{Entry, Header};

    fn header(prev: Hash, height: u32, salt: u8) -> (Header, Hash) {
        let header = Header {
            version: 1,
            prev_block: prev,
            merkle_root: [salt; 32],
            witness_root: [0; 32],
            tree_root: [0; 32],
            reserved_root: [0; 32],
            time: 1_600_000_000 + height as u64,
            bits: 0x2000_ffff,
            nonce: salt as u32,
            solution: vec![],
        };
        let hash = header.hash();
        (header, hash)
    }

    fn entry(prev: Hash, height: u32, salt: u8) -> Entry {
        let (header, hash) = header(prev, height, salt);
        Entry {
            header,
            hash,
            height,
            work: [0; 32],
        }
    }

    #[test]
    fn finds_fork_at_common_ancestor() {
        let genesis = entry([0; 32], 0, 0);
        let mut index = ChainIndex::new(genesis.clone());

        let a = entry(genesis.hash, 1, 1);
        index.insert_tip(a.clone());
        let b = entry(a.hash, 2, 2);
        index.insert_tip(b.clone());
        let c = entry(b.hash, 3, 3);
        index.insert_tip(c.clone());

        // Competing branch forks at `a`.
        let bp = entry(a.hash, 2, 20);
        index.insert_alternate(bp.clone());
        let cp = entry(bp.hash, 3, 30);
        index.insert_alternate(cp.clone());
        let dp = entry(cp.hash, 4, 40);
        index.insert_alternate(dp.clone());

        let reorg = reorganize(&mut index, dp.header.prev_block).unwrap();

        assert_eq!(
            reorg.disconnected.iter().map(|(h, _)| *h).collect::<Vec<_>>(),
            vec![3, 2]
        );
        assert_eq!(
            reorg.connected.iter().map(|(h, _)| *h).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert_eq!(reorg.connected[0].1, bp.hash);
        assert_eq!(reorg.connected[1].1, cp.hash);

        index.insert_tip(dp.clone());
        assert_eq!(index.get_by_height(2).unwrap().hash, bp.hash);
        assert_eq!(index.get_by_height(3).unwrap().hash, cp.hash);
        assert_eq!(index.get_by_height(4).unwrap().hash, dp.hash);
        assert!(index.contains(&b.hash), "old branch stays in `hashes`");
        assert_ne!(index.get_by_height(2).unwrap().hash, b.hash);
    }

    #[test]
    fn missing_ancestor_reports_fork_not_found() {
        let genesis = entry([0; 32], 0, 0);
        let mut index = ChainIndex::new(genesis);
        let result = reorganize(&mut index, [0xff; 32]);
        assert!(matches!(result, Err(ChainError::ForkNotFound)));
    }
}

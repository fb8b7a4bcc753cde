//! Header records: the wire-level fields a peer supplies, and the derived
//! state (`hash`, `height`, `work`) that only exists once a header has been
//! validated and indexed.

use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};
use serde::{Deserialize, Serialize};

use crate::bigint::BigInt256;
use crate::compact;

/// A 32-byte hash, used both for header identity and for the 32-byte
/// big-endian cumulative-work counter.
pub type Hash = [u8; 32];

/// The fields a peer supplies for a candidate header.
///
/// Everything the core needs to validate and chain a header, minus the
/// fields (`hash`, `height`, `work`) that only exist once it has been
/// accepted into the index - see [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header format version.
    pub version: i32,
    /// Hash of the direct predecessor.
    pub prev_block: Hash,
    /// Merkle root of the block's (out-of-scope) transaction tree.
    pub merkle_root: Hash,
    /// Merkle root of the witness tree.
    pub witness_root: Hash,
    /// Merkle root of the name tree.
    pub tree_root: Hash,
    /// Reserved for future extensions; opaque to this crate.
    pub reserved_root: Hash,
    /// Seconds since the Unix epoch.
    pub time: u64,
    /// Compact-encoded proof-of-work target.
    pub bits: u32,
    /// Miner-chosen nonce.
    pub nonce: u32,
    /// Opaque Cuckoo-cycle solution, interpreted only by the injected
    /// [`crate::pow::PowVerifier`].
    pub solution: Vec<u8>,
}

impl Header {
    /// Fixed byte layout used to compute [`Header::hash`]. Consensus-facing
    /// header (de)serialization belongs to a collaborator outside this
    /// crate; this encoding exists only so the chain can identify headers.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(128 + self.solution.len());
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&self.prev_block);
        bytes.extend_from_slice(&self.merkle_root);
        bytes.extend_from_slice(&self.witness_root);
        bytes.extend_from_slice(&self.tree_root);
        bytes.extend_from_slice(&self.reserved_root);
        bytes.extend_from_slice(&self.time.to_le_bytes());
        bytes.extend_from_slice(&self.bits.to_le_bytes());
        bytes.extend_from_slice(&self.nonce.to_le_bytes());
        bytes.extend_from_slice(&self.solution);
        bytes
    }

    /// Computes the header's identity hash. Not cached on `Header` itself -
    /// the cache lives on [`Entry`], the record actually stored in the index.
    pub fn hash(&self) -> Hash {
        let mut engine = sha256d::Hash::engine();
        engine.input(&self.encode());
        let digest = sha256d::Hash::from_engine(engine);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest[..]);
        hash
    }

    /// Decodes the target this header claims to satisfy, as a [`BigInt256`].
    /// `None` if `bits` is not a canonical compact encoding.
    pub fn target(&self) -> Option<BigInt256> {
        compact::to_target_bigint(self.bits)
    }
}

/// A header once it has passed validation and entered the index: the
/// immutable wire fields plus its cached hash, height, and cumulative work.
///
/// Corresponds to the `next`-pointer-bearing record in the distilled spec's
/// data model; the scratch forward link is dropped entirely (see
/// `ForkResolver` in `fork.rs`) in favor of a transient `Vec` built and
/// discarded inside a single reorg call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub header: Header,
    pub hash: Hash,
    pub height: u32,
    pub work: Hash,
}

impl Entry {
    /// Computes `work(header) = work(prev) + floor(2^256 / (target + 1))`,
    /// saturating at `2^256 - 1`. `prev_work` is `None` for genesis.
    pub fn chain_work(target: &BigInt256, prev_work: Option<&Hash>) -> Hash {
        let proof = block_proof(target);
        let base = prev_work
            .map(|bytes| BigInt256::from_be_bytes(bytes))
            .unwrap_or(BigInt256::ZERO);
        base.add(&proof).to_be_bytes()
    }
}

/// `floor(2^256 / (target + 1))`: the proof-of-work a single block with this
/// target represents. Standard chainwork formula (as in Bitcoin Core's
/// `GetBlockProof`), expressed over this crate's `BigInt256`.
fn block_proof(target: &BigInt256) -> BigInt256 {
    let denominator = target.add(&BigInt256::from_u64(1));
    if denominator.is_zero() {
        // target == 2^256 - 1: denominator would be 2^256, out of range.
        return BigInt256::from_u64(1);
    }
    target.not().div(&denominator).add(&BigInt256::from_u64(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Header {
        Header {
            version: 1,
            prev_block: [1u8; 32],
            merkle_root: [2u8; 32],
            witness_root: [3u8; 32],
            tree_root: [4u8; 32],
            reserved_root: [0u8; 32],
            time: 1_600_000_000,
            bits: 0x1d00_ffff,
            nonce: 42,
            solution: vec![9, 9, 9],
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let header = sample_header();
        assert_eq!(header.hash(), header.hash());
    }

    #[test]
    fn hash_changes_with_nonce() {
        let mut header = sample_header();
        let first = header.hash();
        header.nonce += 1;
        assert_ne!(first, header.hash());
    }

    #[test]
    fn chain_work_accumulates() {
        let target = compact::to_target_bigint(0x2000_ffff).unwrap();
        let genesis_work = Entry::chain_work(&target, None);
        let next_work = Entry::chain_work(&target, Some(&genesis_work));
        assert!(BigInt256::from_be_bytes(&next_work) > BigInt256::from_be_bytes(&genesis_work));
    }

    #[test]
    fn lower_target_means_more_work() {
        let easy_target = compact::to_target_bigint(0x2010_0000).unwrap();
        let hard_target = compact::to_target_bigint(0x2001_0000).unwrap();
        let easy_work = BigInt256::from_be_bytes(&Entry::chain_work(&easy_target, None));
        let hard_work = BigInt256::from_be_bytes(&Entry::chain_work(&hard_target, None));
        assert!(hard_work > easy_work);
    }
}

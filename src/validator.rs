//! Stateless per-header validation (§4.5, §4.6).

use crate::bigint::BigInt256;
use crate::clock::Clock;
use crate::constants::{Params, MAX_FUTURE_DRIFT};
use crate::error::ChainError;
use crate::header::{Entry, Hash, Header};
use crate::index::ChainIndex;
use crate::mtp::median_time_past;
use crate::pow::PowVerifier;
use crate::retarget::retarget;

/// What a header turned out to be once validated.
pub enum Validated {
    /// `header.prev_block` is not yet known; file as an orphan.
    Orphan,
    /// Passed every check; ready to be attached to the index at `height`
    /// with cumulative `work`.
    Ready { height: u32, work: Hash },
}

/// Runs every per-header check in §4.5 against `header`/`hash`, in order.
/// Does not mutate `index`.
pub fn validate(
    index: &ChainIndex,
    header: &Header,
    hash: Hash,
    clock: &dyn Clock,
    pow: &dyn PowVerifier,
    params: &Params,
) -> Result<Validated, ChainError> {
    if header.time as i64 > clock.now() + MAX_FUTURE_DRIFT {
        return Err(ChainError::TimeTooNew);
    }

    if index.contains(&hash) {
        return Err(ChainError::Duplicate);
    }

    if index.is_orphan(&hash) {
        return Err(ChainError::DuplicateOrphan);
    }

    pow.verify(header)?;

    let Some(prev) = index.get(&header.prev_block) else {
        return Ok(Validated::Orphan);
    };

    let mtp = median_time_past(index.hashes(), Some(prev));
    if header.time <= mtp {
        return Err(ChainError::TimeTooOld);
    }

    let expected_bits = target_for(index, header.time, Some(prev), params);
    if header.bits != expected_bits {
        return Err(ChainError::BadDiffbits {
            expected: expected_bits,
            actual: header.bits,
        });
    }

    let height = prev.height + 1;
    let target = header
        .target()
        .expect("bits already matched a canonical expected_bits value");
    let work = Entry::chain_work(&target, Some(&prev.work));

    Ok(Validated::Ready { height, work })
}

/// The difficulty `bits` a header extending `prev` (or, if `prev` is
/// `None`, the genesis header itself) must carry (§4.6).
pub fn target_for(
    index: &ChainIndex,
    time: u64,
    prev: Option<&Entry>,
    params: &Params,
) -> u32 {
    let Some(prev) = prev else {
        return params.hsk_bits;
    };

    if params.no_retargetting {
        return params.hsk_bits;
    }

    if params.target_reset && time as i64 > prev.header.time as i64 + params.target_spacing * 2 {
        return params.hsk_bits;
    }

    retarget(index.hashes(), prev, params)
}

/// Computes genesis's own cumulative work (`prev = nil`), asserting that
/// `bits` is the network's canonical default - genesis's `bits` is never
/// subject to `target_for`'s retarget path since it has no predecessor.
pub fn genesis_work(bits: u32, params: &Params) -> Hash {
    debug_assert_eq!(bits, params.hsk_bits, "genesis bits must equal the network default");
    let target = BigInt256::from_be_bytes(
        &crate::compact::to_target(bits).expect("network genesis bits must be canonical"),
    );
    Entry::chain_work(&target, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::constants::Network;
    use crate::index::ChainIndex;
    use crate::pow::AcceptAllVerifier;

    fn genesis_entry(params: &Params) -> Entry {
        let header = Header {
            version: 1,
            prev_block: [0; 32],
            merkle_root: [0; 32],
            witness_root: [0; 32],
            tree_root: [0; 32],
            reserved_root: [0; 32],
            time: 1_600_000_000,
            bits: params.hsk_bits,
            nonce: 0,
            solution: vec![],
        };
        let hash = header.hash();
        let work = genesis_work(header.bits, params);
        Entry {
            header,
            hash,
            height: 0,
            work,
        }
    }

    #[test]
    fn rejects_time_too_new() {
        let params = Network::Regtest.params();
        let genesis = genesis_entry(&params);
        let index = ChainIndex::new(genesis.clone());
        let clock = FixedClock(1_600_000_100);
        let header = Header {
            prev_block: genesis.hash,
            time: (clock.0 + MAX_FUTURE_DRIFT + 1) as u64,
            bits: params.hsk_bits,
            ..genesis.header.clone()
        };
        let hash = header.hash();
        let result = validate(&index, &header, hash, &clock, &AcceptAllVerifier, &params);
        assert!(matches!(result, Err(ChainError::TimeTooNew)));
    }

    #[test]
    fn rejects_time_too_old() {
        let params = Network::Regtest.params();
        let genesis = genesis_entry(&params);
        let index = ChainIndex::new(genesis.clone());
        let clock = FixedClock(genesis.header.time as i64 + 10_000);
        let header = Header {
            prev_block: genesis.hash,
            time: genesis.header.time,
            bits: params.hsk_bits,
            ..genesis.header.clone()
        };
        let hash = header.hash();
        let result = validate(&index, &header, hash, &clock, &AcceptAllVerifier, &params);
        assert!(matches!(result, Err(ChainError::TimeTooOld)));
    }

    #[test]
    fn accepts_time_exactly_at_future_boundary() {
        // The check is strict `>`, so a header exactly `now + 2h` is fine.
        let params = Network::Regtest.params();
        let genesis = genesis_entry(&params);
        let index = ChainIndex::new(genesis.clone());
        let clock = FixedClock(genesis.header.time as i64);
        let header = Header {
            prev_block: genesis.hash,
            time: (clock.0 + MAX_FUTURE_DRIFT) as u64,
            bits: params.hsk_bits,
            ..genesis.header.clone()
        };
        let hash = header.hash();
        let result = validate(&index, &header, hash, &clock, &AcceptAllVerifier, &params);
        assert!(matches!(result, Ok(Validated::Ready { height: 1, .. })));
    }

    #[test]
    fn unknown_parent_is_an_orphan() {
        let params = Network::Regtest.params();
        let genesis = genesis_entry(&params);
        let index = ChainIndex::new(genesis.clone());
        let clock = FixedClock(genesis.header.time as i64 + 10);
        let header = Header {
            prev_block: [0xaa; 32],
            time: genesis.header.time + 10,
            bits: params.hsk_bits,
            ..genesis.header.clone()
        };
        let hash = header.hash();
        let result = validate(&index, &header, hash, &clock, &AcceptAllVerifier, &params);
        assert!(matches!(result, Ok(Validated::Orphan)));
    }

    #[test]
    fn rejects_wrong_diffbits() {
        let params = Network::Regtest.params();
        let genesis = genesis_entry(&params);
        let index = ChainIndex::new(genesis.clone());
        let clock = FixedClock(genesis.header.time as i64 + 10);
        let header = Header {
            prev_block: genesis.hash,
            time: genesis.header.time + 10,
            bits: params.hsk_bits.wrapping_add(1),
            ..genesis.header.clone()
        };
        let hash = header.hash();
        let result = validate(&index, &header, hash, &clock, &AcceptAllVerifier, &params);
        assert!(matches!(result, Err(ChainError::BadDiffbits { .. })));
    }

    #[test]
    fn detects_duplicate() {
        let params = Network::Regtest.params();
        let genesis = genesis_entry(&params);
        let index = ChainIndex::new(genesis.clone());
        let clock = FixedClock(genesis.header.time as i64 + 10);
        let result = validate(
            &index,
            &genesis.header,
            genesis.hash,
            &clock,
            &AcceptAllVerifier,
            &params,
        );
        assert!(matches!(result, Err(ChainError::Duplicate)));
    }
}

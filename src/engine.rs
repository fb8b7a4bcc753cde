//! The public facade: wires together the index, validator, and fork
//! resolver behind a single `add` entry point (§5).

use crate::clock::{Clock, SystemClock};
use crate::constants::{Network, Params};
use crate::error::ChainError;
use crate::fork;
use crate::header::{Entry, Hash, Header};
use crate::index::ChainIndex;
use crate::locator::{self, Locator};
use crate::pow::{AcceptAllVerifier, PowVerifier};
use crate::validator::{self, Validated};

/// What happened to a header passed to [`ChainEngine::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Accepted as the very first non-genesis header (kept distinct from
    /// `Extended` only for caller-friendly logging; both attach at the tip).
    Connected { height: u32 },
    /// Its parent is not yet known; filed as an orphan.
    Orphan,
    /// Attached directly to the current tip.
    Extended { height: u32 },
    /// Attached to a branch with more cumulative work than the current tip;
    /// the main chain was rewound and replayed onto it.
    Reorganized {
        height: u32,
        disconnected: Vec<(u32, Hash)>,
        connected: Vec<(u32, Hash)>,
    },
}

/// Owns the chain state and the collaborators (`Clock`, `PowVerifier`)
/// needed to validate incoming headers. The only type most callers need.
pub struct ChainEngine {
    index: ChainIndex,
    params: Params,
    clock: Box<dyn Clock>,
    pow: Box<dyn PowVerifier>,
}

impl ChainEngine {
    /// Builds an engine rooted at `network`'s canonical genesis header,
    /// using the real wall clock and a verifier that accepts every header
    /// (swap in a real Cuckoo-cycle verifier with [`ChainEngine::with_pow`]).
    pub fn new(network: Network, genesis_header: Header) -> Self {
        let params = network.params();
        let hash = genesis_header.hash();
        let work = validator::genesis_work(genesis_header.bits, &params);
        let genesis = Entry {
            header: genesis_header,
            hash,
            height: 0,
            work,
        };
        ChainEngine {
            index: ChainIndex::new(genesis),
            params,
            clock: Box::new(SystemClock),
            pow: Box::new(AcceptAllVerifier),
        }
    }

    /// Replaces the injected proof-of-work verifier.
    pub fn with_pow(mut self, pow: impl PowVerifier + 'static) -> Self {
        self.pow = Box::new(pow);
        self
    }

    /// Replaces the injected clock (tests use this to pin `now()`).
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Current main-chain tip.
    pub fn tip(&self) -> &Entry {
        self.index.tip()
    }

    /// Current main-chain height.
    pub fn height(&self) -> u32 {
        self.index.height()
    }

    /// The genesis entry.
    pub fn genesis(&self) -> &Entry {
        self.index.genesis()
    }

    /// Looks up any known header (main chain or alternate branch) by hash.
    pub fn get(&self, hash: &Hash) -> Option<&Entry> {
        self.index.get(hash)
    }

    /// Looks up the main-chain header at `height`, if any.
    pub fn get_by_height(&self, height: u32) -> Option<&Entry> {
        self.index.get_by_height(height)
    }

    /// Builds a locator rooted at the current tip (§4.9).
    pub fn locator(&self) -> Locator {
        locator::build(&self.index)
    }

    /// Validates and attempts to attach `header` to the chain.
    ///
    /// Does not promote any orphan buffered against `header`'s hash - that
    /// promotion is left to the host, which should re-submit the orphans it
    /// is holding (via its own record of `prevs`, or by calling
    /// [`ChainEngine::resolve_orphans`]) once a header they depend on lands.
    pub fn add(&mut self, header: Header) -> Result<AddOutcome, ChainError> {
        let hash = header.hash();
        self.add_one(header, hash)
    }

    fn add_one(&mut self, header: Header, hash: Hash) -> Result<AddOutcome, ChainError> {
        let validated = validator::validate(
            &self.index,
            &header,
            hash,
            self.clock.as_ref(),
            self.pow.as_ref(),
            &self.params,
        )?;

        let (height, work) = match validated {
            Validated::Orphan => {
                log::info!(target: "chain", "orphan header {}", hex(&hash));
                self.index.insert_orphan(ChainIndex::build_entry(header, hash, 0, [0; 32]));
                return Ok(AddOutcome::Orphan);
            }
            Validated::Ready { height, work } => (height, work),
        };

        let tip = self.index.tip();
        let extends_tip = header.prev_block == tip.hash;
        let more_work = crate::bigint::BigInt256::from_be_bytes(&work)
            > crate::bigint::BigInt256::from_be_bytes(&tip.work);

        let entry = ChainIndex::build_entry(header.clone(), hash, height, work);

        if extends_tip {
            self.index.insert_tip(entry);
            log::info!(target: "chain", "accepted header {} at height {}", hex(&hash), height);
            let outcome = if height == 1 {
                AddOutcome::Connected { height }
            } else {
                AddOutcome::Extended { height }
            };
            return Ok(outcome);
        }

        self.index.insert_alternate(entry);

        if !more_work {
            log::info!(
                target: "chain",
                "accepted header {} on alternate branch at height {} (no reorg: insufficient work)",
                hex(&hash),
                height,
            );
            return Ok(AddOutcome::Extended { height });
        }

        let reorg = fork::reorganize(&mut self.index, header.prev_block)?;
        self.index.connect_height(height, hash);
        self.index.set_tip(hash);

        log::warn!(
            target: "chain",
            "reorganized to header {} at height {}: disconnected {} block(s), connected {} block(s)",
            hex(&hash),
            height,
            reorg.disconnected.len(),
            reorg.connected.len(),
        );

        Ok(AddOutcome::Reorganized {
            height,
            disconnected: reorg.disconnected,
            connected: reorg.connected,
        })
    }

    /// Re-attempts every orphan chained off `prev_hash`, transitively: if
    /// attaching one orphan unblocks another (its child was also buffered),
    /// that child is attempted in the same pass.
    ///
    /// Not called by [`ChainEngine::add`] itself - orphan promotion is a
    /// host-driven resolution pass, triggered externally once the host
    /// knows a header's parent has landed.
    pub fn resolve_orphans(&mut self, prev_hash: Hash) -> Vec<(Hash, Result<AddOutcome, ChainError>)> {
        let mut results = Vec::new();
        let mut queue = vec![prev_hash];

        while let Some(prev) = queue.pop() {
            let Some(orphan) = self.index.take_orphan_waiting_on(&prev) else {
                continue;
            };
            let hash = orphan.hash;
            let header = orphan.header;
            let result = self.add_one(header, hash);
            let attached = !matches!(result, Err(_) | Ok(AddOutcome::Orphan));
            results.push((hash, result));
            if attached {
                queue.push(hash);
            }
        }

        results
    }
}

fn hex(hash: &Hash) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

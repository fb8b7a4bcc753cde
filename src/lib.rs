//! # hdr-chain
//!
//! An in-memory proof-of-work header chain: validates incoming headers
//! against a sliding-window difficulty retarget, tracks cumulative
//! chainwork, buffers headers whose parent hasn't arrived yet, and
//! reorganizes onto a competing branch once it outweighs the current tip.
//!
//! Block and transaction contents are out of scope - this crate only
//! tracks the header chain itself, the way a header-first SPV client does.
//!
//! ## Usage
//!
//! ```
//! use hdr_chain::{ChainEngine, Network, Header};
//!
//! let genesis = Header {
//!     version: 1,
//!     prev_block: [0; 32],
//!     merkle_root: [0; 32],
//!     witness_root: [0; 32],
//!     tree_root: [0; 32],
//!     reserved_root: [0; 32],
//!     time: 1_600_000_000,
//!     bits: 0x207f_ffff,
//!     nonce: 0,
//!     solution: vec![],
//! };
//!
//! let engine = ChainEngine::new(Network::Regtest, genesis);
//! assert_eq!(engine.height(), 0);
//! ```
//!
//! ## Architecture
//!
//! - [`bigint`] - fixed-width 256-bit arithmetic backing targets and chainwork
//! - [`compact`] - the `bits` <-> target codec
//! - [`header`] - wire-level `Header` and indexed `Entry`
//! - [`clock`] / [`pow`] - injectable collaborators (wall clock, PoW solver)
//! - [`constants`] - per-[`Network`] consensus parameters
//! - [`mtp`] / [`retarget`] - median-time-past and difficulty retargeting
//! - [`index`] - the chain's owning maps (main chain, branches, orphans)
//! - [`validator`] - stateless per-header acceptance checks
//! - [`fork`] - common-ancestor search and reorg splicing
//! - [`locator`] - block locator construction
//! - [`engine`] - [`ChainEngine`], the facade tying everything together

pub mod bigint;
pub mod clock;
pub mod compact;
pub mod constants;
pub mod engine;
pub mod error;
pub mod fork;
pub mod header;
pub mod index;
pub mod locator;
pub mod mtp;
pub mod pow;
pub mod retarget;
pub mod validator;

pub use clock::{Clock, SystemClock};
pub use constants::{Network, Params};
pub use engine::{AddOutcome, ChainEngine};
pub use error::{ChainError, Result};
pub use header::{Entry, Hash, Header};
pub use locator::Locator;
pub use pow::{AcceptAllVerifier, PowError, PowVerifier};

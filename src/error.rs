//! Error types returned by the chain engine.

use thiserror::Error;

use crate::pow::PowError;

/// Every way `ChainEngine::add` can reject a header, plus the one genuinely
/// internal failure mode ([`ChainError::ForkNotFound`]) the Rust rendition
/// of the fork resolver needs (§4.8, §9).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// Caller passed a header that violates this crate's own preconditions
    /// (currently unreachable from `add`, kept for interface parity with
    /// the source's `HSK_EBADARGS`).
    #[error("bad arguments")]
    BadArgs,

    /// Kept for interface parity with the source's `HSK_ENOMEM`. Safe Rust's
    /// `HashMap`/`BTreeMap` have no distinct insertion-failure path reachable
    /// from consensus-sized input, so this variant is never constructed.
    #[error("allocation failed")]
    Oom,

    /// `header.time` is more than `MAX_FUTURE_DRIFT` seconds ahead of now.
    #[error("header timestamp is too far in the future")]
    TimeTooNew,

    /// `header.time` does not exceed the median time past of its ancestors.
    #[error("header timestamp is not greater than the median time past")]
    TimeTooOld,

    /// The header's hash is already present in the main/alternate index.
    #[error("duplicate header")]
    Duplicate,

    /// The header's hash is already queued as an orphan.
    #[error("duplicate orphan header")]
    DuplicateOrphan,

    /// `header.bits` does not match the expected retarget/policy value.
    #[error("bad difficulty bits: expected {expected:#010x}, got {actual:#010x}")]
    BadDiffbits {
        /// The value `target_for` computed.
        expected: u32,
        /// The value the header actually carried.
        actual: u32,
    },

    /// The injected proof-of-work verifier rejected the header.
    #[error("proof-of-work rejected: {0}")]
    Pow(#[from] PowError),

    /// The fork resolver could not walk back to a common ancestor between
    /// the current tip and the incoming branch, even though the chain
    /// index's invariants guarantee one exists. Indicates index corruption
    /// rather than a problem with the submitted header.
    #[error("no common ancestor found between tip and candidate branch")]
    ForkNotFound,
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ChainError>;

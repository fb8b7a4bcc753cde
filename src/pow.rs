//! Proof-of-work verification collaborator.
//!
//! The Cuckoo-cycle inner hash itself is out of scope for this crate (§1):
//! the core only needs a yes/no (or, on failure, a reason) answer for a
//! candidate header. Modeled as an injectable trait so the chain engine is
//! testable without a real Cuckoo-cycle solver.

use thiserror::Error;

use crate::header::Header;

/// Why a header's claimed proof-of-work solution was rejected.
///
/// The verifier is opaque to this crate (§4.5): these variants describe the
/// shape of what a Cuckoo-cycle verifier can report, not anything this
/// crate itself computes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowError {
    /// The target implied by `bits` does not decode (bad compact encoding).
    #[error("invalid compact target encoding")]
    BadTarget,
    /// The solution's hash does not beat the target.
    #[error("proof-of-work hash does not meet target")]
    HighHash,
    /// The Cuckoo-cycle solution itself failed graph verification.
    #[error("invalid cuckoo cycle solution")]
    BadCycle,
}

/// External collaborator that checks a header's proof-of-work solution.
pub trait PowVerifier {
    /// Verifies `header`'s proof-of-work. Any `Err` is treated by the chain
    /// engine as invalid PoW and causes the header to be rejected outright.
    fn verify(&self, header: &Header) -> Result<(), PowError>;
}

/// A verifier that accepts every header, for tests that exercise chain
/// logic (reorgs, retargeting, orphan handling) without a real Cuckoo-cycle
/// solver on hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllVerifier;

impl PowVerifier for AcceptAllVerifier {
    fn verify(&self, _header: &Header) -> Result<(), PowError> {
        Ok(())
    }
}

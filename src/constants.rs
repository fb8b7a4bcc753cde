//! Consensus constants.
//!
//! The distilled spec names two independent network-mode booleans,
//! `NO_RETARGETTING` and `TARGET_RESET` (§4.6); in practice a node only ever
//! runs against one of a small, closed set of networks, so this crate
//! groups them (plus the numeric constants that also vary per network) into
//! a `Network` enum with one constant table each - the generalization the
//! original's two free-floating booleans were implicitly reaching for.

use crate::header::Hash;

/// Which network a [`crate::engine::ChainEngine`] is validating against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Production network: full retargeting, no difficulty-floor reset.
    Main,
    /// Public test network: difficulty resets to the floor after a long gap
    /// between blocks, so testnet doesn't get stuck at high difficulty.
    Testnet,
    /// Regression-test network: retargeting disabled outright, every block
    /// uses the default target.
    Regtest,
    /// Local simulation network: same retargeting behavior as testnet, on
    /// a much shorter block spacing for fast iteration.
    Simnet,
}

/// Per-network consensus parameters consumed by the retargeter and validator.
#[derive(Debug, Clone, Copy)]
pub struct Params {
    /// Default / initial compact target.
    pub hsk_bits: u32,
    /// Maximum allowed target (minimum difficulty), 32-byte big-endian.
    pub pow_limit: Hash,
    /// Number of ancestors the retargeter averages over.
    pub target_window: u32,
    /// Ideal timespan for `target_window` blocks, in seconds.
    pub target_timespan: i64,
    /// Ideal spacing between blocks, in seconds.
    pub target_spacing: i64,
    /// Lower clamp for the dampened actual timespan.
    pub min_actual: i64,
    /// Upper clamp for the dampened actual timespan.
    pub max_actual: i64,
    /// If true, `target_for` always returns `hsk_bits` (regtest).
    pub no_retargetting: bool,
    /// If true, a long gap since the previous block resets to `hsk_bits`
    /// (testnet/simnet).
    pub target_reset: bool,
}

impl Network {
    /// Looks up this network's consensus parameters.
    pub const fn params(self) -> Params {
        match self {
            Network::Main => MAIN_PARAMS,
            Network::Testnet => TESTNET_PARAMS,
            Network::Regtest => REGTEST_PARAMS,
            Network::Simnet => SIMNET_PARAMS,
        }
    }
}

const MAIN_POW_LIMIT: Hash = [
    0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff,
];

const MAIN_PARAMS: Params = Params {
    hsk_bits: 0x1d00_ffff,
    pow_limit: MAIN_POW_LIMIT,
    target_window: 144,
    target_timespan: 144 * 600,
    target_spacing: 600,
    min_actual: (144 * 600) / 4,
    max_actual: (144 * 600) * 4,
    no_retargetting: false,
    target_reset: false,
};

const TESTNET_PARAMS: Params = Params {
    hsk_bits: 0x1d00_ffff,
    pow_limit: MAIN_POW_LIMIT,
    target_window: 144,
    target_timespan: 144 * 600,
    target_spacing: 600,
    min_actual: (144 * 600) / 4,
    max_actual: (144 * 600) * 4,
    no_retargetting: false,
    target_reset: true,
};

const REGTEST_POW_LIMIT: Hash = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff,
];

const REGTEST_PARAMS: Params = Params {
    hsk_bits: 0x207f_ffff,
    pow_limit: REGTEST_POW_LIMIT,
    target_window: 144,
    target_timespan: 144 * 600,
    target_spacing: 600,
    min_actual: (144 * 600) / 4,
    max_actual: (144 * 600) * 4,
    no_retargetting: true,
    target_reset: false,
};

const SIMNET_PARAMS: Params = Params {
    hsk_bits: 0x207f_ffff,
    pow_limit: REGTEST_POW_LIMIT,
    target_window: 144,
    target_timespan: 144 * 10,
    target_spacing: 10,
    min_actual: (144 * 10) / 4,
    max_actual: (144 * 10) * 4,
    no_retargetting: false,
    target_reset: true,
};

/// Maximum number of ancestor timestamps folded into a median-time-past
/// computation.
pub const MEDIAN_TIMESPAN: usize = 11;

/// Maximum number of hashes a [`crate::locator::Locator`] carries.
pub const MAX_LOCATOR_HASHES: usize = 64;

/// How far into the future a header's timestamp may sit relative to
/// [`crate::clock::Clock::now`] before it is rejected as `TimeTooNew`.
pub const MAX_FUTURE_DRIFT: i64 = 2 * 60 * 60;

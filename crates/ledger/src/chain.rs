//! Synthetic chain metadata.
//!
//! Transaction ids, block references and resource costs are display values, not
//! the output of any consensus. They come from a pluggable generator so tests can
//! pin them.

use uuid::Uuid;

use crate::entry::{LedgerAction, TxId};

/// Block reference of the first ledger entry.
pub const GENESIS_BLOCK: u64 = 1_234_567;

/// Resource cost charged for a registration announcement.
pub const REGISTRATION_COST: u64 = 21_000;

/// Range of resource costs for every other action: `[base, base + spread)`.
pub const TRANSFER_COST_BASE: u64 = 30_000;
pub const TRANSFER_COST_SPREAD: u64 = 50_000;

/// Generator for per-entry metadata. `sequence` is the 1-based position the
/// entry will take in the store.
pub trait ChainMetadata: Send + Sync {
    /// Candidate transaction id. The store retries on collision.
    fn next_tx_id(&mut self, sequence: u64) -> TxId;

    fn block_reference(&mut self, sequence: u64) -> u64 {
        GENESIS_BLOCK + sequence.saturating_sub(1)
    }

    fn resource_cost(&mut self, sequence: u64, action: &str) -> u64;
}

/// Default generator: UUIDv7-backed transaction ids and pseudo-random costs.
#[derive(Debug, Clone)]
pub struct SyntheticChain {
    seed: u64,
}

impl SyntheticChain {
    pub fn new() -> Self {
        // Low bits of a v7 UUID are random.
        Self {
            seed: Uuid::now_v7().as_u128() as u64,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for SyntheticChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainMetadata for SyntheticChain {
    fn next_tx_id(&mut self, _sequence: u64) -> TxId {
        TxId::new(format!("0x{}", Uuid::now_v7().simple()))
    }

    fn resource_cost(&mut self, sequence: u64, action: &str) -> u64 {
        if action == LedgerAction::REGISTERED {
            return REGISTRATION_COST;
        }
        TRANSFER_COST_BASE + splitmix64(self.seed ^ sequence) % TRANSFER_COST_SPREAD
    }
}

/// Fully predictable generator for tests and fixtures.
///
/// Ids are `0x` followed by the zero-padded hex sequence number.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicChain;

impl DeterministicChain {
    pub const TRANSFER_COST: u64 = 45_000;
}

impl ChainMetadata for DeterministicChain {
    fn next_tx_id(&mut self, sequence: u64) -> TxId {
        TxId::new(format!("0x{sequence:08x}"))
    }

    fn resource_cost(&mut self, _sequence: u64, action: &str) -> u64 {
        if action == LedgerAction::REGISTERED {
            REGISTRATION_COST
        } else {
            Self::TRANSFER_COST
        }
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

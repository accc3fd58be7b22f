//! Custody ledger (append-only transaction log).
//!
//! Pure domain logic only: no IO, no persistence concerns. The ledger knows
//! nothing about the product registry; product ids are opaque strings here.

pub mod chain;
pub mod entry;
pub mod store;

pub use chain::{ChainMetadata, DeterministicChain, GENESIS_BLOCK, SyntheticChain};
pub use entry::{LedgerAction, LedgerEntry, TxId};
pub use store::LedgerStore;

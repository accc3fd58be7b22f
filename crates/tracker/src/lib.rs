//! Application layer: keeps the product registry and the ledger in step.
//!
//! The domain crates expose the two stores independently; this crate pairs every
//! custody change with its ledger announcement, loads configuration and demo
//! data, and shapes results for display.

pub mod config;
pub mod error;
pub mod seed;
pub mod tracker;
pub mod view;

pub use config::TrackerConfig;
pub use error::{ConfigError, TrackerError};
pub use tracker::{Registration, Snapshot, SupplyChainTracker, Transfer};
pub use view::{DashboardSummary, short_tx_id};

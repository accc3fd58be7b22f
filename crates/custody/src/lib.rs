//! Custody domain module.
//!
//! Tracks products through the supply chain as an append-only journey of custody
//! snapshots. Pure, deterministic domain logic: no IO, no logging, no storage.
//! Ledger announcements are the caller's job (see `tracechain-tracker`).

pub mod pricing;
pub mod product;
pub mod registry;
pub mod status;

pub use pricing::{FlatPricing, NoPricing, PricingModel};
pub use product::{JourneyStep, NewProduct, Product, ProductId};
pub use registry::{ProductIdSource, ProductRegistry, SequentialProductIds};
pub use status::CustodyStatus;

//! `tracechain-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the custody registry
//! and the ledger (no IO, no storage, no logging).

pub mod clock;
pub mod entity;
pub mod error;
pub mod value_object;

pub use clock::{Clock, FixedClock, SteppingClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult, require_text};
pub use value_object::ValueObject;

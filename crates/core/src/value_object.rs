//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and never change once built. A journey step is
/// the canonical example here: a snapshot of who held a product, where, and when.
/// To "change" one, append a new snapshot instead.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

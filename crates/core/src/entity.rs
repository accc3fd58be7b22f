//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Products and ledger entries are both entities: two records are the same
/// record when their identifiers match, regardless of the rest of their state.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

use core::borrow::Borrow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tracechain_core::Entity;

/// Transaction identifier (e.g. `0x0190f3c2...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TxId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TxId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Well-known ledger actions.
///
/// The ledger stores actions as text; this type only builds the canonical
/// wording so every writer spells it the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerAction {
    /// A product entered the registry.
    Registered,
    /// Custody moved to the status with the given display label.
    StatusUpdated(String),
}

impl LedgerAction {
    pub const REGISTERED: &'static str = "Product Registered";

    pub fn status_updated(label: impl Into<String>) -> Self {
        Self::StatusUpdated(label.into())
    }
}

impl core::fmt::Display for LedgerAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LedgerAction::Registered => f.write_str(Self::REGISTERED),
            LedgerAction::StatusUpdated(label) => write!(f, "Status Updated to {label}"),
        }
    }
}

impl From<LedgerAction> for String {
    fn from(value: LedgerAction) -> Self {
        value.to_string()
    }
}

/// One ledger transaction (immutable once appended).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    id: TxId,
    /// 1-based insertion position in the store.
    sequence: u64,
    product_id: String,
    action: String,
    from: String,
    to: String,
    timestamp: DateTime<Utc>,
    block_reference: u64,
    resource_cost: u64,
}

impl LedgerEntry {
    /// Build an entry outside a store (recorded history, fixtures).
    ///
    /// The sequence number is assigned when the entry is imported.
    pub fn recorded(
        id: TxId,
        product_id: impl Into<String>,
        action: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sequence: 0,
            product_id: product_id.into(),
            action: action.into(),
            from: from.into(),
            to: to.into(),
            timestamp,
            block_reference: 0,
            resource_cost: 0,
        }
    }

    pub fn with_chain_metadata(mut self, block_reference: u64, resource_cost: u64) -> Self {
        self.block_reference = block_reference;
        self.resource_cost = resource_cost;
        self
    }

    pub(crate) fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn id_typed(&self) -> &TxId {
        &self.id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn block_reference(&self) -> u64 {
        self.block_reference
    }

    pub fn resource_cost(&self) -> u64 {
        self.resource_cost
    }
}

impl Entity for LedgerEntry {
    type Id = TxId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_wording() {
        assert_eq!(LedgerAction::Registered.to_string(), "Product Registered");
        assert_eq!(
            String::from(LedgerAction::status_updated("Warehouse")),
            "Status Updated to Warehouse"
        );
    }
}

//! Demo dataset: two products with recorded history and their transactions.

use chrono::{DateTime, NaiveDate, Utc};

use tracechain_core::{DomainError, DomainResult};
use tracechain_custody::{CustodyStatus, JourneyStep, Product, ProductId, ProductRegistry};
use tracechain_ledger::{GENESIS_BLOCK, LedgerAction, LedgerEntry, LedgerStore, TxId};

#[derive(Debug, Clone, PartialEq)]
pub struct DemoDataset {
    pub products: Vec<Product>,
    pub transactions: Vec<LedgerEntry>,
}

fn at(rfc3339: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::invariant(format!("bad fixture timestamp {rfc3339}: {e}")))
}

fn day(iso: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map_err(|e| DomainError::invariant(format!("bad fixture date {iso}: {e}")))
}

fn step(status: CustodyStatus, owner: &str, timestamp: &str, location: &str) -> DomainResult<JourneyStep> {
    Ok(JourneyStep {
        status,
        owner: owner.to_string(),
        timestamp: at(timestamp)?,
        location: location.to_string(),
    })
}

pub fn demo_dataset() -> DomainResult<DemoDataset> {
    let tomatoes = Product::from_journey(
        ProductId::new("PROD001"),
        "Organic Tomatoes",
        "John Smith",
        day("2024-01-15")?,
        vec![
            step(CustodyStatus::Origin, "John Smith", "2024-01-15T08:00:00Z", "Farm A1")?,
            step(
                CustodyStatus::Warehouse,
                "Fresh Farms Warehouse",
                "2024-01-16T10:30:00Z",
                "Warehouse District",
            )?,
        ],
        Some(45.50),
    )?;

    let apples = Product::from_journey(
        ProductId::new("PROD002"),
        "Premium Apples",
        "Sarah Johnson",
        day("2024-01-14")?,
        vec![
            step(CustodyStatus::Origin, "Sarah Johnson", "2024-01-14T07:15:00Z", "Orchard B2")?,
            step(
                CustodyStatus::Warehouse,
                "Fresh Farms Warehouse",
                "2024-01-15T11:45:00Z",
                "Warehouse District",
            )?,
            step(
                CustodyStatus::Distributor,
                "QuickDistrib Co.",
                "2024-01-16T16:30:00Z",
                "Distribution Center",
            )?,
            step(CustodyStatus::Market, "City Market", "2024-01-17T14:20:00Z", "Downtown Market")?,
        ],
        Some(32.75),
    )?;

    let transactions = vec![
        LedgerEntry::recorded(
            TxId::new("0x1a2b3c4d"),
            "PROD001",
            LedgerAction::Registered,
            "System",
            "John Smith",
            at("2024-01-15T08:00:00Z")?,
        )
        .with_chain_metadata(GENESIS_BLOCK, 21_000),
        LedgerEntry::recorded(
            TxId::new("0x2b3c4d5e"),
            "PROD001",
            LedgerAction::status_updated(CustodyStatus::Warehouse.label()),
            "John Smith",
            "Fresh Farms Warehouse",
            at("2024-01-16T10:30:00Z")?,
        )
        .with_chain_metadata(GENESIS_BLOCK + 1, 45_000),
    ];

    Ok(DemoDataset {
        products: vec![tomatoes, apples],
        transactions,
    })
}

/// Import the demo dataset.
///
/// All ids are checked up front; a clash is a `Conflict` and nothing is imported.
pub fn load_demo(registry: &mut ProductRegistry, ledger: &mut LedgerStore) -> DomainResult<()> {
    let dataset = demo_dataset()?;

    for product in &dataset.products {
        if registry.contains(product.id_typed().as_str()) {
            return Err(DomainError::conflict(format!(
                "product {} already exists",
                product.id_typed()
            )));
        }
    }
    for entry in &dataset.transactions {
        if ledger.get(entry.id_typed().as_str()).is_some() {
            return Err(DomainError::conflict(format!(
                "transaction {} already recorded",
                entry.id_typed()
            )));
        }
    }

    for product in dataset.products {
        registry.import_product(product)?;
    }
    for entry in dataset.transactions {
        ledger.import_entry(entry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_is_well_formed() {
        let dataset = demo_dataset().unwrap();
        assert_eq!(dataset.products.len(), 2);
        assert_eq!(dataset.transactions.len(), 2);

        let apples = &dataset.products[1];
        assert_eq!(apples.current_status(), CustodyStatus::Market);
        assert_eq!(apples.current_owner(), "City Market");
        assert_eq!(apples.journey().len(), 4);
    }

    #[test]
    fn loading_twice_is_a_conflict_without_side_effects() {
        let mut registry = ProductRegistry::new();
        let mut ledger = LedgerStore::new();

        load_demo(&mut registry, &mut ledger).unwrap();
        assert!(load_demo(&mut registry, &mut ledger).is_err());

        assert_eq!(registry.len(), 2);
        assert_eq!(ledger.len(), 2);

        let next = registry.register_product("Carrots", "Ana", "2024-02-01").unwrap();
        assert_eq!(next.id_typed().as_str(), "PROD003");
    }
}

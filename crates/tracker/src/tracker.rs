//! Custody command pipeline (application-level orchestration).
//!
//! The registry and the ledger are independent stores. This module keeps them
//! consistent: every successful registry mutation is followed by exactly one
//! ledger announcement, both under the same write lock.
//!
//! ```text
//! request
//!   ↓
//! 1. take the write lock
//!   ↓
//! 2. capture the previous owner (transfers)
//!   ↓
//! 3. mutate the registry (validates first; errors leave state untouched)
//!   ↓
//! 4. append the matching ledger entry
//!   ↓
//! 5. release the lock, log, return both records
//! ```
//!
//! Readers take the read lock, so they never observe a transition without its
//! ledger entry.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use tracechain_core::{Clock, DomainError, SystemClock};
use tracechain_custody::{CustodyStatus, JourneyStep, Product, ProductRegistry};
use tracechain_ledger::{LedgerAction, LedgerEntry, LedgerStore};

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::seed;
use crate::view::DashboardSummary;

/// Result of a registration: the product and its announcement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub product: Product,
    pub transaction: LedgerEntry,
}

/// Result of a custody transfer: the appended step and its announcement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    pub product_id: String,
    pub step: JourneyStep,
    pub transaction: LedgerEntry,
}

/// Consistent point-in-time view of both stores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub products: Vec<Product>,
    /// Insertion order.
    pub transactions: Vec<LedgerEntry>,
    pub summary: DashboardSummary,
}

#[derive(Debug)]
struct State {
    registry: ProductRegistry,
    ledger: LedgerStore,
}

/// Registry + ledger behind one lock.
#[derive(Debug)]
pub struct SupplyChainTracker {
    state: RwLock<State>,
    config: TrackerConfig,
}

impl SupplyChainTracker {
    /// Build with default generators and a wall clock, seeding demo data if
    /// the configuration asks for it.
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let registry = ProductRegistry::new()
            .with_clock(clock.clone())
            .with_origin_location(config.origin_location.clone());
        let ledger = LedgerStore::new().with_clock(clock);

        Self::from_parts(registry, ledger, config)
    }

    /// Build around caller-supplied stores (custom generators, clocks, pricing).
    ///
    /// The registry's origin location is left as the caller configured it.
    pub fn from_parts(
        mut registry: ProductRegistry,
        mut ledger: LedgerStore,
        config: TrackerConfig,
    ) -> Result<Self, TrackerError> {
        if config.seed_demo_data {
            seed::load_demo(&mut registry, &mut ledger)?;
            tracing::info!(
                products = registry.len(),
                transactions = ledger.len(),
                "loaded demo dataset"
            );
        }

        Ok(Self {
            state: RwLock::new(State { registry, ledger }),
            config,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Register a product and announce it on the ledger.
    pub fn register_product(
        &self,
        name: &str,
        originator_name: &str,
        production_date: &str,
    ) -> Result<Registration, TrackerError> {
        let mut state = self.write()?;

        let product = state
            .registry
            .register_product(name, originator_name, production_date)
            .inspect_err(|e| tracing::warn!(error = %e, "registration rejected"))?;

        let transaction = state.ledger.append_entry(
            product.id_typed().as_str(),
            LedgerAction::Registered,
            &self.config.registration_sender,
            product.originator_name(),
        );
        drop(state);

        tracing::info!(
            product_id = %product.id_typed(),
            originator = product.originator_name(),
            tx_id = %transaction.id_typed(),
            "product registered"
        );

        Ok(Registration {
            product,
            transaction,
        })
    }

    /// Transfer custody and announce it on the ledger.
    ///
    /// The announcement's `from` is the owner before the transfer.
    pub fn advance_status(
        &self,
        product_id: &str,
        new_status: &str,
        new_owner: &str,
    ) -> Result<Transfer, TrackerError> {
        let status: CustodyStatus = new_status.parse().inspect_err(|e: &DomainError| {
            tracing::warn!(product_id, error = %e, "transfer rejected")
        })?;

        let mut state = self.write()?;

        let previous_owner = state
            .registry
            .product(product_id)
            .map(|p| p.current_owner().to_string());

        let step = state
            .registry
            .advance_to(product_id, status, new_owner)
            .inspect_err(|e| tracing::warn!(product_id, error = %e, "transfer rejected"))?;

        // advance_to only succeeds for known products.
        let previous_owner = previous_owner.unwrap_or_default();

        let transaction = state.ledger.append_entry(
            product_id,
            LedgerAction::status_updated(step.status.label()),
            &previous_owner,
            &step.owner,
        );
        drop(state);

        tracing::info!(
            product_id,
            status = %step.status,
            from = %previous_owner,
            to = %step.owner,
            tx_id = %transaction.id_typed(),
            "custody transferred"
        );

        Ok(Transfer {
            product_id: product_id.to_string(),
            step,
            transaction,
        })
    }

    pub fn product(&self, product_id: &str) -> Result<Product, TrackerError> {
        Ok(self.read()?.registry.get_product(product_id)?)
    }

    pub fn products(&self) -> Result<Vec<Product>, TrackerError> {
        Ok(self.read()?.registry.list_products())
    }

    /// The configured window of transactions, most recent first.
    pub fn recent_transactions(&self) -> Result<Vec<LedgerEntry>, TrackerError> {
        Ok(self
            .read()?
            .ledger
            .recent_entries(Some(self.config.ledger_window)))
    }

    /// Every transaction mentioning `product_id`, oldest first.
    pub fn transactions_for(&self, product_id: &str) -> Result<Vec<LedgerEntry>, TrackerError> {
        Ok(self.read()?.ledger.entries_for_product(product_id))
    }

    pub fn summary(&self) -> Result<DashboardSummary, TrackerError> {
        let state = self.read()?;
        Ok(DashboardSummary::from_parts(
            state.registry.iter(),
            state.ledger.len(),
        ))
    }

    pub fn snapshot(&self) -> Result<Snapshot, TrackerError> {
        let state = self.read()?;
        Ok(Snapshot {
            products: state.registry.list_products(),
            transactions: state.ledger.entries().to_vec(),
            summary: DashboardSummary::from_parts(state.registry.iter(), state.ledger.len()),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, TrackerError> {
        self.state.read().map_err(|_| TrackerError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, TrackerError> {
        self.state.write().map_err(|_| TrackerError::Poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tracechain_core::SteppingClock;
    use tracechain_ledger::DeterministicChain;

    fn test_tracker(config: TrackerConfig) -> SupplyChainTracker {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(SteppingClock::new(start, Duration::minutes(10)));
        let registry = ProductRegistry::new()
            .with_clock(clock.clone())
            .with_origin_location(config.origin_location.clone());
        let ledger = LedgerStore::new()
            .with_chain(DeterministicChain)
            .with_clock(clock);
        SupplyChainTracker::from_parts(registry, ledger, config).unwrap()
    }

    #[test]
    fn registration_is_announced_from_the_system() {
        let tracker = test_tracker(TrackerConfig::default());
        let registration = tracker
            .register_product("Tomatoes", "John Smith", "2024-01-15")
            .unwrap();

        let tx = &registration.transaction;
        assert_eq!(tx.product_id(), "PROD001");
        assert_eq!(tx.action(), "Product Registered");
        assert_eq!(tx.from(), "System");
        assert_eq!(tx.to(), "John Smith");
        assert_eq!(tx.resource_cost(), 21_000);
    }

    #[test]
    fn transfer_is_announced_from_the_previous_owner() {
        let tracker = test_tracker(TrackerConfig::default());
        tracker
            .register_product("Tomatoes", "John Smith", "2024-01-15")
            .unwrap();

        let transfer = tracker
            .advance_status("PROD001", "warehouse", "Fresh Farms Warehouse")
            .unwrap();
        assert_eq!(transfer.transaction.action(), "Status Updated to Warehouse");
        assert_eq!(transfer.transaction.from(), "John Smith");
        assert_eq!(transfer.transaction.to(), "Fresh Farms Warehouse");

        let transfer = tracker
            .advance_status("PROD001", "market", "City Market")
            .unwrap();
        assert_eq!(transfer.transaction.from(), "Fresh Farms Warehouse");
        assert_eq!(transfer.step.location, "Retail Location");
    }

    #[test]
    fn rejected_transfer_leaves_both_stores_untouched() {
        let tracker = test_tracker(TrackerConfig::default());
        tracker
            .register_product("Tomatoes", "John Smith", "2024-01-15")
            .unwrap();
        let before = tracker.snapshot().unwrap();

        let cases = [
            ("PROD999", "market", "X"),
            ("PROD001", "origin", "X"),
            ("PROD001", "unknown", "X"),
            ("PROD001", "market", ""),
        ];
        for (id, status, owner) in cases {
            let err = tracker.advance_status(id, status, owner).unwrap_err();
            assert!(err.domain().is_some());
        }

        assert_eq!(tracker.snapshot().unwrap(), before);
    }

    #[test]
    fn rejected_registration_leaves_both_stores_untouched() {
        let tracker = test_tracker(TrackerConfig::default());
        tracker
            .register_product("Tomatoes", "John Smith", "2024-01-15")
            .unwrap();
        let before = tracker.snapshot().unwrap();

        let cases = [
            ("", "John Smith", "2024-01-15"),
            ("Apples", "   ", "2024-01-14"),
            ("Apples", "Sarah Johnson", "2024-02-30"),
            ("Apples", "Sarah Johnson", ""),
        ];
        for (name, originator, date) in cases {
            let err = tracker.register_product(name, originator, date).unwrap_err();
            assert!(matches!(err, TrackerError::Domain(DomainError::Validation(_))));
        }

        let after = tracker.snapshot().unwrap();
        assert_eq!(after, before);
        assert_eq!(after.transactions.len(), 1);

        let next = tracker.register_product("Apples", "Sarah Johnson", "2024-01-14").unwrap();
        assert_eq!(next.product.id_typed().as_str(), "PROD002");
        assert_eq!(next.transaction.sequence(), 2);
    }

    #[test]
    fn recent_transactions_respects_the_configured_window() {
        let config = TrackerConfig {
            ledger_window: 2,
            ..TrackerConfig::default()
        };
        let tracker = test_tracker(config);
        for name in ["A", "B", "C"] {
            tracker.register_product(name, "Grower", "2024-01-15").unwrap();
        }

        let recent = tracker.recent_transactions().unwrap();
        let ids: Vec<_> = recent.iter().map(|t| t.product_id().to_string()).collect();
        assert_eq!(ids, vec!["PROD003", "PROD002"]);
    }

    #[test]
    fn demo_seed_continues_numbering() {
        let config = TrackerConfig {
            seed_demo_data: true,
            ..TrackerConfig::default()
        };
        let tracker = test_tracker(config);

        let summary = tracker.summary().unwrap();
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.ledger_entries, 2);

        let registration = tracker.register_product("Carrots", "Ana", "2024-02-01").unwrap();
        assert_eq!(registration.product.id_typed().as_str(), "PROD003");
        assert_eq!(registration.transaction.sequence(), 3);
    }
}

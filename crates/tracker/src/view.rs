//! Presentation helpers: pure functions shaping core data for display.

use std::collections::BTreeMap;

use serde::Serialize;

use tracechain_custody::{CustodyStatus, Product};

/// Compact form of a transaction id: first 10 characters, `...`, last 4.
///
/// Ids of 14 characters or fewer are returned unchanged.
pub fn short_tx_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 14 {
        return id.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Headline numbers for a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_products: usize,
    pub by_status: BTreeMap<CustodyStatus, usize>,
    pub ledger_entries: usize,
}

impl DashboardSummary {
    pub fn from_parts<'a>(products: impl IntoIterator<Item = &'a Product>, ledger_entries: usize) -> Self {
        let mut by_status: BTreeMap<CustodyStatus, usize> =
            CustodyStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut total_products = 0;

        for product in products {
            *by_status.entry(product.current_status()).or_default() += 1;
            total_products += 1;
        }

        Self {
            total_products,
            by_status,
            ledger_entries,
        }
    }

    pub fn count(&self, status: CustodyStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use tracechain_core::{Clock, DomainError, DomainResult, SystemClock};

use crate::chain::{ChainMetadata, SyntheticChain};
use crate::entry::{LedgerEntry, TxId};

/// Fresh draws from the generator before falling back to suffixed ids.
const MAX_TX_ID_DRAWS: usize = 8;

/// Append-only store of ledger entries.
///
/// - Entries are never mutated or removed.
/// - Insertion order is the audit order; `sequence` numbers are 1-based and
///   strictly increasing.
/// - Product ids are not checked against any registry.
pub struct LedgerStore {
    entries: Vec<LedgerEntry>,
    ids: HashSet<TxId>,
    chain: Box<dyn ChainMetadata>,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ids: HashSet::new(),
            chain: Box::new(SyntheticChain::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_chain(mut self, chain: impl ChainMetadata + 'static) -> Self {
        self.chain = Box::new(chain);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Append a transaction. Never fails.
    pub fn append_entry(
        &mut self,
        product_id: &str,
        action: impl Into<String>,
        from: &str,
        to: &str,
    ) -> LedgerEntry {
        let sequence = self.next_sequence();
        let action = action.into();
        let id = self.unique_tx_id(sequence);
        let block_reference = self.chain.block_reference(sequence);
        let resource_cost = self.chain.resource_cost(sequence, &action);

        let entry = LedgerEntry::recorded(id, product_id, action, from, to, self.clock.now())
            .with_chain_metadata(block_reference, resource_cost)
            .with_sequence(sequence);

        self.push(entry.clone());
        entry
    }

    /// Append a previously recorded entry at the tail (seed data, imports).
    ///
    /// The entry is re-sequenced; its id must not already be present.
    pub fn import_entry(&mut self, entry: LedgerEntry) -> DomainResult<()> {
        if entry.id_typed().as_str().trim().is_empty() {
            return Err(DomainError::validation("transaction id cannot be empty"));
        }
        if self.ids.contains(entry.id_typed()) {
            return Err(DomainError::conflict(format!(
                "transaction {} already recorded",
                entry.id_typed()
            )));
        }
        let sequence = self.next_sequence();
        self.push(entry.with_sequence(sequence));
        Ok(())
    }

    /// Most recent first, at most `limit` entries (all entries when `None`).
    pub fn recent_entries(&self, limit: Option<usize>) -> Vec<LedgerEntry> {
        let limit = limit.unwrap_or(self.entries.len());
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Entries mentioning `product_id`, in insertion order.
    pub fn entries_for_product(&self, product_id: &str) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.product_id() == product_id)
            .cloned()
            .collect()
    }

    pub fn get(&self, tx_id: &str) -> Option<&LedgerEntry> {
        if !self.ids.contains(tx_id) {
            return None;
        }
        self.entries.iter().find(|e| e.id_typed().as_str() == tx_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_sequence(&self) -> u64 {
        self.entries.last().map(|e| e.sequence()).unwrap_or(0) + 1
    }

    fn unique_tx_id(&mut self, sequence: u64) -> TxId {
        let mut candidate = self.chain.next_tx_id(sequence);
        for _ in 1..MAX_TX_ID_DRAWS {
            if !self.ids.contains(&candidate) {
                return candidate;
            }
            candidate = self.chain.next_tx_id(sequence);
        }

        // The generator keeps repeating itself; disambiguate with a suffix.
        let base = candidate;
        let mut n = 0u64;
        loop {
            let suffixed = TxId::new(format!("{base}-{sequence}-{n}"));
            if !self.ids.contains(&suffixed) {
                return suffixed;
            }
            n += 1;
        }
    }

    fn push(&mut self, entry: LedgerEntry) {
        self.ids.insert(entry.id_typed().clone());
        self.entries.push(entry);
    }
}

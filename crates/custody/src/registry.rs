//! Authoritative in-memory product set and the custody state machine.

use std::collections::HashMap;
use std::sync::Arc;

use tracechain_core::{Clock, DomainError, DomainResult, SystemClock, require_text};

use crate::pricing::{NoPricing, PricingModel};
use crate::product::{JourneyStep, NewProduct, Product, ProductId};
use crate::status::CustodyStatus;

/// Location recorded on the origin step unless configured otherwise.
pub const DEFAULT_ORIGIN_LOCATION: &str = "Farm Location";

/// Upper bound on id draws per registration before giving up.
const MAX_ID_ATTEMPTS: usize = 16;

/// Source of candidate product identifiers.
///
/// Candidates may collide with existing ids; the registry retries. `None` means
/// the source has run out of ids.
pub trait ProductIdSource: Send + Sync {
    fn next_id(&mut self) -> Option<ProductId>;

    /// Called for every id the registry admits, including imported ones.
    fn observe(&mut self, _existing: &ProductId) {}
}

/// `PROD001`, `PROD002`, ... (zero-padded to three digits, wider when needed).
#[derive(Debug, Clone)]
pub struct SequentialProductIds {
    prefix: String,
    /// `None` once the counter has passed `u64::MAX`.
    next: Option<u64>,
}

impl SequentialProductIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Some(1),
        }
    }

    pub fn starting_at(mut self, next: u64) -> Self {
        self.next = Some(next);
        self
    }
}

impl Default for SequentialProductIds {
    fn default() -> Self {
        Self::new("PROD")
    }
}

impl ProductIdSource for SequentialProductIds {
    fn next_id(&mut self) -> Option<ProductId> {
        let n = self.next?;
        self.next = n.checked_add(1);
        Some(ProductId::new(format!("{}{:03}", self.prefix, n)))
    }

    fn observe(&mut self, existing: &ProductId) {
        let Some(suffix) = existing.as_str().strip_prefix(self.prefix.as_str()) else {
            return;
        };
        if let Ok(n) = suffix.parse::<u64>() {
            self.next = match (self.next, n.checked_add(1)) {
                (Some(next), Some(after)) => Some(next.max(after)),
                _ => None,
            };
        }
    }
}

/// Registry of tracked products.
///
/// Products are kept in insertion order. Every public mutator validates its
/// whole input before touching state, so a returned error means nothing changed.
pub struct ProductRegistry {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    ids: Box<dyn ProductIdSource>,
    pricing: Box<dyn PricingModel>,
    clock: Arc<dyn Clock>,
    origin_location: String,
}

impl core::fmt::Debug for ProductRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductRegistry")
            .field("products", &self.products.len())
            .field("origin_location", &self.origin_location)
            .finish_non_exhaustive()
    }
}

impl Default for ProductRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductRegistry {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            index: HashMap::new(),
            ids: Box::new(SequentialProductIds::default()),
            pricing: Box::new(NoPricing),
            clock: Arc::new(SystemClock),
            origin_location: DEFAULT_ORIGIN_LOCATION.to_string(),
        }
    }

    pub fn with_id_source(mut self, ids: impl ProductIdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        for product in &self.products {
            self.ids.observe(product.id_typed());
        }
        self
    }

    pub fn with_pricing(mut self, pricing: impl PricingModel + 'static) -> Self {
        self.pricing = Box::new(pricing);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_origin_location(mut self, location: impl Into<String>) -> Self {
        self.origin_location = location.into();
        self
    }

    /// Register a new product at origin, held by its originator.
    ///
    /// Does not announce anything on the ledger; that is the caller's job.
    pub fn register_product(
        &mut self,
        name: &str,
        originator_name: &str,
        production_date: &str,
    ) -> DomainResult<Product> {
        let input = NewProduct::parse(name, originator_name, production_date)?;
        self.register(input)
    }

    /// Register from already-validated input.
    pub fn register(&mut self, input: NewProduct) -> DomainResult<Product> {
        let id = self.fresh_id()?;
        let predicted_price = self.pricing.predict(&input);
        let product = Product::registered(
            id,
            input,
            &self.origin_location,
            self.clock.now(),
            predicted_price,
        );

        self.insert(product.clone());
        Ok(product)
    }

    /// Move a product into a new custody status held by `new_owner`.
    ///
    /// `new_status` is boundary text; it must name a non-origin status.
    pub fn advance_status(
        &mut self,
        product_id: &str,
        new_status: &str,
        new_owner: &str,
    ) -> DomainResult<JourneyStep> {
        let status: CustodyStatus = new_status.parse()?;
        self.advance_to(product_id, status, new_owner)
    }

    /// Typed form of [`advance_status`](Self::advance_status).
    ///
    /// Any non-origin status may follow any other status; supply chains are free
    /// to skip or revisit stages.
    pub fn advance_to(
        &mut self,
        product_id: &str,
        status: CustodyStatus,
        new_owner: &str,
    ) -> DomainResult<JourneyStep> {
        let Some(location) = status.transfer_location() else {
            return Err(DomainError::validation(format!(
                "cannot transfer custody to '{status}'"
            )));
        };
        require_text("new owner", new_owner)?;

        let idx = self.position(product_id)?;

        let step = JourneyStep {
            status,
            owner: new_owner.trim().to_string(),
            timestamp: self.clock.now(),
            location: location.to_string(),
        };
        self.products[idx].push_step(step.clone());

        Ok(step)
    }

    pub fn get_product(&self, product_id: &str) -> DomainResult<Product> {
        self.product(product_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.index.get(product_id).map(|&idx| &self.products[idx])
    }

    /// Owned snapshot in insertion order; later mutations do not affect it.
    pub fn list_products(&self) -> Vec<Product> {
        self.products.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.index.contains_key(product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Admit a product with recorded history (seed data, imports).
    pub fn import_product(&mut self, product: Product) -> DomainResult<()> {
        if self.contains(product.id_typed().as_str()) {
            return Err(DomainError::conflict(format!(
                "product {} already exists",
                product.id_typed()
            )));
        }
        self.insert(product);
        Ok(())
    }

    fn position(&self, product_id: &str) -> DomainResult<usize> {
        self.index
            .get(product_id)
            .copied()
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))
    }

    fn fresh_id(&mut self) -> DomainResult<ProductId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let Some(candidate) = self.ids.next_id() else {
                return Err(DomainError::invariant("product id source exhausted"));
            };
            if !candidate.as_str().trim().is_empty() && !self.index.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(DomainError::invariant(format!(
            "no unused product id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    fn insert(&mut self, product: Product) {
        self.ids.observe(product.id_typed());
        self.index
            .insert(product.id_typed().clone(), self.products.len());
        self.products.push(product);
    }
}

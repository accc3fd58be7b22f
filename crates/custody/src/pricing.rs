//! Price prediction seam.
//!
//! Predicting a price is not a custody concern. The registry asks an injected
//! model once, at registration, and stores whatever comes back.

use crate::product::NewProduct;

/// Supplies `predicted_price` for newly registered products.
pub trait PricingModel: Send + Sync {
    fn predict(&self, product: &NewProduct) -> Option<f64>;
}

/// No prediction; products are registered without a price.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPricing;

impl PricingModel for NoPricing {
    fn predict(&self, _product: &NewProduct) -> Option<f64> {
        None
    }
}

/// Same price for every product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatPricing(pub f64);

impl PricingModel for FlatPricing {
    fn predict(&self, _product: &NewProduct) -> Option<f64> {
        Some(self.0)
    }
}

impl<F> PricingModel for F
where
    F: Fn(&NewProduct) -> Option<f64> + Send + Sync,
{
    fn predict(&self, product: &NewProduct) -> Option<f64> {
        self(product)
    }
}

use core::borrow::Borrow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use tracechain_core::{DomainError, DomainResult, Entity, ValueObject, require_text};

use crate::status::CustodyStatus;

/// Product identifier (e.g. `PROD001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One custody snapshot (immutable once appended to a journey).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyStep {
    pub status: CustodyStatus,
    pub owner: String,
    pub timestamp: DateTime<Utc>,
    pub location: String,
}

impl ValueObject for JourneyStep {}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub originator_name: String,
    pub production_date: NaiveDate,
}

impl NewProduct {
    /// Date format accepted for `production_date` (calendar date, ISO 8601).
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    /// Validate raw registration fields.
    pub fn parse(name: &str, originator_name: &str, production_date: &str) -> DomainResult<Self> {
        require_text("name", name)?;
        require_text("originator name", originator_name)?;
        require_text("production date", production_date)?;

        let production_date = NaiveDate::parse_from_str(production_date.trim(), Self::DATE_FORMAT)
            .map_err(|e| {
                DomainError::validation(format!(
                    "production date '{production_date}' is not a calendar date: {e}"
                ))
            })?;

        Ok(Self {
            name: name.trim().to_string(),
            originator_name: originator_name.trim().to_string(),
            production_date,
        })
    }
}

/// A tracked product and its custody journey.
///
/// `current_owner`, `current_status` and `last_updated` always mirror the last
/// journey step, and the journey always starts at origin. Fields are private so
/// the only ways to obtain a `Product` are registration and
/// [`Product::from_journey`], both of which uphold that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    originator_name: String,
    production_date: NaiveDate,
    current_owner: String,
    current_status: CustodyStatus,
    last_updated: DateTime<Utc>,
    journey: Vec<JourneyStep>,
    predicted_price: Option<f64>,
}

impl Product {
    /// Freshly registered product: a journey of one origin step.
    pub(crate) fn registered(
        id: ProductId,
        input: NewProduct,
        origin_location: &str,
        at: DateTime<Utc>,
        predicted_price: Option<f64>,
    ) -> Self {
        let origin = JourneyStep {
            status: CustodyStatus::Origin,
            owner: input.originator_name.clone(),
            timestamp: at,
            location: origin_location.to_string(),
        };

        Self {
            id,
            name: input.name,
            current_owner: input.originator_name.clone(),
            originator_name: input.originator_name,
            production_date: input.production_date,
            current_status: CustodyStatus::Origin,
            last_updated: at,
            journey: vec![origin],
            predicted_price: predicted_price.filter(|p| p.is_finite()),
        }
    }

    /// Rebuild a product from a recorded journey (imports, fixtures).
    ///
    /// The current owner/status/timestamp are derived from the journey tail.
    pub fn from_journey(
        id: ProductId,
        name: &str,
        originator_name: &str,
        production_date: NaiveDate,
        journey: Vec<JourneyStep>,
        predicted_price: Option<f64>,
    ) -> DomainResult<Self> {
        require_text("product id", id.as_str())?;
        require_text("name", name)?;
        require_text("originator name", originator_name)?;

        let Some(first) = journey.first() else {
            return Err(DomainError::invariant("journey cannot be empty"));
        };
        if first.status != CustodyStatus::Origin {
            return Err(DomainError::invariant("journey must start at origin"));
        }
        for (idx, step) in journey.iter().enumerate() {
            if step.owner.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "journey step {idx} has no owner"
                )));
            }
            if idx > 0 && !step.status.is_transfer_target() {
                return Err(DomainError::invariant(format!(
                    "journey step {idx} returns to origin"
                )));
            }
        }

        // Non-empty was checked above.
        let tail = &journey[journey.len() - 1];

        Ok(Self {
            id,
            name: name.to_string(),
            originator_name: originator_name.to_string(),
            production_date,
            current_owner: tail.owner.clone(),
            current_status: tail.status,
            last_updated: tail.timestamp,
            journey,
            predicted_price: predicted_price.filter(|p| p.is_finite()),
        })
    }

    /// Append a custody step and move the current fields to match it.
    pub(crate) fn push_step(&mut self, step: JourneyStep) {
        self.current_owner = step.owner.clone();
        self.current_status = step.status;
        self.last_updated = step.timestamp;
        self.journey.push(step);
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn originator_name(&self) -> &str {
        &self.originator_name
    }

    pub fn production_date(&self) -> NaiveDate {
        self.production_date
    }

    pub fn current_owner(&self) -> &str {
        &self.current_owner
    }

    pub fn current_status(&self) -> CustodyStatus {
        self.current_status
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn journey(&self) -> &[JourneyStep] {
        &self.journey
    }

    pub fn predicted_price(&self) -> Option<f64> {
        self.predicted_price
    }

    /// Most recent custody step.
    pub fn latest_step(&self) -> &JourneyStep {
        // Construction guarantees at least the origin step.
        &self.journey[self.journey.len() - 1]
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn step(status: CustodyStatus, owner: &str, day: u32) -> JourneyStep {
        JourneyStep {
            status,
            owner: owner.to_string(),
            timestamp: at(day, 8),
            location: "Somewhere".to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn new_product_parses_and_trims_fields() {
        let input = NewProduct::parse(" Tomatoes ", "John Smith", "2024-01-15").unwrap();
        assert_eq!(input.name, "Tomatoes");
        assert_eq!(input.originator_name, "John Smith");
        assert_eq!(input.production_date, date());
    }

    #[test]
    fn new_product_rejects_missing_fields() {
        assert!(NewProduct::parse("", "John", "2024-01-15").unwrap_err().is_validation());
        assert!(NewProduct::parse("Tomatoes", "  ", "2024-01-15").unwrap_err().is_validation());
        assert!(NewProduct::parse("Tomatoes", "John", "").unwrap_err().is_validation());
    }

    #[test]
    fn new_product_rejects_unparsable_dates() {
        for bad in ["15/01/2024", "2024-13-01", "2024-02-30", "yesterday"] {
            let err = NewProduct::parse("Tomatoes", "John", bad).unwrap_err();
            assert!(err.is_validation(), "expected validation error for {bad}");
        }
    }

    #[test]
    fn registered_product_mirrors_origin_step() {
        let input = NewProduct::parse("Tomatoes", "John Smith", "2024-01-15").unwrap();
        let product = Product::registered(
            ProductId::new("PROD001"),
            input,
            "Farm Location",
            at(15, 8),
            Some(45.5),
        );

        assert_eq!(product.journey().len(), 1);
        assert_eq!(product.current_status(), CustodyStatus::Origin);
        assert_eq!(product.current_owner(), "John Smith");
        assert_eq!(product.last_updated(), at(15, 8));
        assert_eq!(product.latest_step().location, "Farm Location");
        assert_eq!(product.predicted_price(), Some(45.5));
    }

    #[test]
    fn non_finite_prices_are_dropped() {
        let input = NewProduct::parse("Tomatoes", "John Smith", "2024-01-15").unwrap();
        let product =
            Product::registered(ProductId::new("PROD001"), input, "Farm", at(15, 8), Some(f64::NAN));
        assert_eq!(product.predicted_price(), None);
    }

    #[test]
    fn from_journey_derives_current_fields_from_tail() {
        let product = Product::from_journey(
            ProductId::new("PROD002"),
            "Premium Apples",
            "Sarah Johnson",
            date(),
            vec![
                step(CustodyStatus::Origin, "Sarah Johnson", 14),
                step(CustodyStatus::Market, "City Market", 17),
            ],
            None,
        )
        .unwrap();

        assert_eq!(product.current_owner(), "City Market");
        assert_eq!(product.current_status(), CustodyStatus::Market);
        assert_eq!(product.last_updated(), at(17, 8));
    }

    #[test]
    fn from_journey_rejects_malformed_journeys() {
        let empty = Product::from_journey(ProductId::new("P"), "n", "o", date(), vec![], None);
        assert!(matches!(empty, Err(DomainError::InvariantViolation(_))));

        let no_origin = Product::from_journey(
            ProductId::new("P"),
            "n",
            "o",
            date(),
            vec![step(CustodyStatus::Warehouse, "W", 15)],
            None,
        );
        assert!(matches!(no_origin, Err(DomainError::InvariantViolation(_))));

        let back_to_origin = Product::from_journey(
            ProductId::new("P"),
            "n",
            "o",
            date(),
            vec![
                step(CustodyStatus::Origin, "o", 15),
                step(CustodyStatus::Origin, "o", 16),
            ],
            None,
        );
        assert!(matches!(back_to_origin, Err(DomainError::InvariantViolation(_))));
    }
}

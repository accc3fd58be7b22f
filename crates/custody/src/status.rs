use core::str::FromStr;

use serde::{Deserialize, Serialize};

use tracechain_core::DomainError;

/// Custody status: the role of whoever currently holds a product.
///
/// The set is closed. Text coming from outside is parsed with [`FromStr`] and
/// anything outside the set is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustodyStatus {
    Origin,
    Warehouse,
    Distributor,
    Market,
}

impl CustodyStatus {
    pub const ALL: [CustodyStatus; 4] = [
        CustodyStatus::Origin,
        CustodyStatus::Warehouse,
        CustodyStatus::Distributor,
        CustodyStatus::Market,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CustodyStatus::Origin => "origin",
            CustodyStatus::Warehouse => "warehouse",
            CustodyStatus::Distributor => "distributor",
            CustodyStatus::Market => "market",
        }
    }

    /// Capitalized display label ("Warehouse").
    pub fn label(self) -> &'static str {
        match self {
            CustodyStatus::Origin => "Origin",
            CustodyStatus::Warehouse => "Warehouse",
            CustodyStatus::Distributor => "Distributor",
            CustodyStatus::Market => "Market",
        }
    }

    /// Whether a product may be moved into this status by a custody transfer.
    ///
    /// Origin is only ever the first journey step.
    pub fn is_transfer_target(self) -> bool {
        self != CustodyStatus::Origin
    }

    /// Location recorded for a transfer into this status.
    ///
    /// `None` for origin: its location comes from registration, not from this map.
    pub fn transfer_location(self) -> Option<&'static str> {
        match self {
            CustodyStatus::Origin => None,
            CustodyStatus::Warehouse => Some("Warehouse District"),
            CustodyStatus::Distributor => Some("Distribution Center"),
            CustodyStatus::Market => Some("Retail Location"),
        }
    }
}

impl core::fmt::Display for CustodyStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustodyStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            // "farmer" is the legacy name of the origin role.
            "origin" | "farmer" => Ok(CustodyStatus::Origin),
            "warehouse" => Ok(CustodyStatus::Warehouse),
            "distributor" => Ok(CustodyStatus::Distributor),
            "market" => Ok(CustodyStatus::Market),
            other => Err(DomainError::validation(format!(
                "unknown custody status '{other}'"
            ))),
        }
    }
}

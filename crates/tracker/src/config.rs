//! Tracker configuration.
//!
//! Every setting has a default; `from_env` overrides them from
//! `TRACECHAIN_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ORIGIN_LOCATION_ENV: &str = "TRACECHAIN_ORIGIN_LOCATION";
pub const LEDGER_WINDOW_ENV: &str = "TRACECHAIN_LEDGER_WINDOW";
pub const REGISTRATION_SENDER_ENV: &str = "TRACECHAIN_REGISTRATION_SENDER";
pub const SEED_DEMO_ENV: &str = "TRACECHAIN_SEED_DEMO";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Location recorded on every origin step.
    pub origin_location: String,
    /// Number of transactions shown by `recent_transactions`.
    pub ledger_window: usize,
    /// `from` party of registration announcements.
    pub registration_sender: String,
    /// Load the demo products and transactions at startup.
    pub seed_demo_data: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            origin_location: "Farm Location".to_string(),
            ledger_window: 10,
            registration_sender: "System".to_string(),
            seed_demo_data: false,
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (unset keys keep their defaults).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(location) = non_blank(lookup(ORIGIN_LOCATION_ENV)) {
            config.origin_location = location;
        }
        if let Some(sender) = non_blank(lookup(REGISTRATION_SENDER_ENV)) {
            config.registration_sender = sender;
        }
        if let Some(raw) = non_blank(lookup(LEDGER_WINDOW_ENV)) {
            config.ledger_window = raw.parse().map_err(|e| ConfigError::Invalid {
                key: LEDGER_WINDOW_ENV.to_string(),
                reason: format!("'{raw}': {e}"),
            })?;
        }
        if let Some(raw) = non_blank(lookup(SEED_DEMO_ENV)) {
            config.seed_demo_data = parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                key: SEED_DEMO_ENV.to_string(),
                reason: format!("'{raw}' is not a boolean"),
            })?;
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

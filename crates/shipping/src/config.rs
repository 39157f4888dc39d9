//! Shipping configuration.
//!
//! The box catalog, filter rules, and units are immutable, process-wide
//! configuration injected into the packer and filter at construction time
//! (never read from ambient global state), which keeps the core testable
//! without process-wide setup. Provider credentials load from the
//! environment.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHIPPO_API_TOKEN` - Shippo API token
//!
//! ## Optional
//! - `SHIPPO_TIMEOUT_SECS` - Provider request timeout (default: 20)

use secrecy::SecretString;
use thiserror::Error;

use tidepool_core::{DistanceUnit, MassUnit};

use crate::filter::RateFilterConfig;
use crate::packing::{BoxCatalog, BoxSpec};

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Static configuration for the shipping pipeline.
#[derive(Debug, Clone)]
pub struct ShippingConfig {
    /// Ordered box catalog, read-only during packing.
    pub catalog: BoxCatalog,
    /// Rate filtering and classification rules.
    pub filter: RateFilterConfig,
    /// Distance unit applied uniformly to every parcel sent to the provider.
    pub distance_unit: DistanceUnit,
    /// Mass unit applied uniformly to every parcel sent to the provider.
    pub mass_unit: MassUnit,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            filter: RateFilterConfig::default(),
            distance_unit: DistanceUnit::Cm,
            mass_unit: MassUnit::Kg,
        }
    }
}

/// The stock box sizes carried at the warehouse, cheapest first.
fn default_catalog() -> BoxCatalog {
    BoxCatalog::new(vec![
        BoxSpec::new("bx-s", "Small Box", 23.0, 18.0, 12.0, 1.0),
        BoxSpec::new("bx-m", "Medium Box", 33.0, 25.0, 15.0, 1.5),
        BoxSpec::new("bx-l", "Large Box", 45.0, 35.0, 20.0, 2.5),
        BoxSpec::new("bx-xl", "Extra Large Box", 60.0, 45.0, 30.0, 4.0),
    ])
}

/// Shippo API client configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ShippoConfig {
    /// Shippo API token.
    pub api_token: SecretString,
    /// Request timeout in seconds; on timeout the whole rate calculation
    /// fails as a provider error, never a partial result.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ShippoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippoConfig")
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ShippoConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `SHIPPO_API_TOKEN` is missing or
    /// `SHIPPO_TIMEOUT_SECS` is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_token = get_required_secret("SHIPPO_API_TOKEN")?;
        let timeout_secs = match std::env::var("SHIPPO_TIMEOUT_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("SHIPPO_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_token,
            timeout_secs,
        })
    }
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(key)
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

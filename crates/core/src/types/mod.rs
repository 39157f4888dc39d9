//! Core types for Tidepool.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod country;
pub mod price;
pub mod sku;
pub mod units;

pub use country::CountryCode;
pub use price::{CurrencyCode, CurrencyError, ExchangeRates, Price};
pub use sku::Sku;
pub use units::{DistanceUnit, MassUnit};

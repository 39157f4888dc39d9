//! Type-safe price representation using decimal arithmetic.
//!
//! Monetary amounts are always `rust_decimal::Decimal` - string-encoded
//! carrier amounts are parsed at the wire boundary and never floated.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// Errors that can occur during currency operations.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// Currency code not recognized.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// No exchange rate configured for a currency.
    #[error("No exchange rate configured for {0}")]
    MissingRate(CurrencyCode),
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The display symbol for this currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(CurrencyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// A table of exchange rates relative to a base currency.
///
/// Conversion between two non-base currencies goes through the base:
/// the amount is divided by the source rate and multiplied by the target
/// rate. The base currency itself always has an implicit rate of 1.
#[derive(Debug, Clone)]
pub struct ExchangeRates {
    base: CurrencyCode,
    rates: HashMap<CurrencyCode, Decimal>,
}

impl ExchangeRates {
    /// Create a rate table with the given base currency.
    #[must_use]
    pub fn new(base: CurrencyCode) -> Self {
        Self {
            base,
            rates: HashMap::new(),
        }
    }

    /// Add a rate: one unit of `base` equals `rate` units of `currency`.
    #[must_use]
    pub fn with_rate(mut self, currency: CurrencyCode, rate: Decimal) -> Self {
        self.rates.insert(currency, rate);
        self
    }

    /// The base currency of this table.
    #[must_use]
    pub const fn base(&self) -> CurrencyCode {
        self.base
    }

    fn rate_for(&self, currency: CurrencyCode) -> Result<Decimal, CurrencyError> {
        if currency == self.base {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&currency)
            .copied()
            .ok_or(CurrencyError::MissingRate(currency))
    }

    /// Convert an amount between two currencies.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::MissingRate` if either currency has no
    /// configured rate.
    pub fn convert(
        &self,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Decimal, CurrencyError> {
        if from == to {
            return Ok(amount);
        }
        let from_rate = self.rate_for(from)?;
        let to_rate = self.rate_for(to)?;
        Ok(amount / from_rate * to_rate)
    }
}

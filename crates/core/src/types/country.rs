//! Country code newtype with normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An ISO 3166-1 alpha-2 country code, normalized to uppercase.
///
/// Upstream address data arrives with inconsistent casing and stray
/// whitespace; normalizing at construction time means two `CountryCode`s
/// can be compared directly (the customs builder relies on this to decide
/// whether a shipment crosses a border).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Create a country code, trimming whitespace and uppercasing.
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_ascii_uppercase())
    }

    /// The normalized code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_code_normalizes() {
        assert_eq!(CountryCode::new(" ca ").as_str(), "CA");
        assert_eq!(CountryCode::new("us"), CountryCode::new("US"));
    }

    #[test]
    fn test_country_code_empty() {
        assert!(CountryCode::new("  ").is_empty());
        assert!(!CountryCode::new("DE").is_empty());
    }
}

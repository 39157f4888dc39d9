//! SKU newtype for type-safe item identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stock keeping unit identifier.
///
/// Used as item identity within a packing run: all instances of a SKU are
/// physically identical and group together in parcel manifests and customs
/// line items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Create a new SKU.
    #[must_use]
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    /// The SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(sku: &str) -> Self {
        Self::new(sku)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_display() {
        let sku = Sku::new("TSHIRT-M-BLUE");
        assert_eq!(sku.to_string(), "TSHIRT-M-BLUE");
        assert_eq!(sku.as_str(), "TSHIRT-M-BLUE");
    }
}

//! Error taxonomy for the shipping core.
//!
//! Everything except a currency-conversion failure during filtering is a
//! fail-fast, whole-operation failure: customs forms and carrier manifests
//! are legally binding, so an incomplete quote is worse than no quote.

use thiserror::Error;

use tidepool_core::Sku;

use crate::packing::PackingError;
use crate::provider::ProviderError;

/// Errors surfaced by the shipping rate pipeline.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// Shipping-critical data is missing or invalid. The message names the
    /// offending field, SKU, or address source so the layer above can surface
    /// an actionable configuration error.
    #[error("Missing shipping data: {0}")]
    MissingData(String),

    /// No box in the catalog can hold one of the items. Logged distinctly
    /// from other failures for diagnosis, but treated the same as "no rates
    /// available" by callers.
    #[error("No suitable box found in catalog for {sku}")]
    NoSuitableBox { sku: Sku },

    /// The external rate provider call failed. Propagated unmodified; no
    /// retry is performed inside this core.
    #[error("Rate provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl ShippingError {
    /// Shorthand for a `MissingData` error.
    pub(crate) fn missing(message: impl Into<String>) -> Self {
        Self::MissingData(message.into())
    }
}

impl From<PackingError> for ShippingError {
    fn from(err: PackingError) -> Self {
        match err {
            PackingError::ItemTooLarge { sku } => Self::NoSuitableBox { sku },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_display() {
        let err = ShippingError::missing("Destination Address: missing required field 'street1'");
        assert_eq!(
            err.to_string(),
            "Missing shipping data: Destination Address: missing required field 'street1'"
        );
    }

    #[test]
    fn test_no_suitable_box_names_sku() {
        let err = ShippingError::NoSuitableBox {
            sku: Sku::new("KAYAK-XL"),
        };
        assert!(err.to_string().contains("KAYAK-XL"));
    }

    #[test]
    fn test_packing_error_conversion() {
        let err: ShippingError = PackingError::ItemTooLarge {
            sku: Sku::new("SOFA-3S"),
        }
        .into();
        assert!(matches!(err, ShippingError::NoSuitableBox { .. }));
    }
}

//! Measurement units sent to the rate provider.
//!
//! Distance and mass units are fixed by configuration and applied uniformly
//! to every parcel in a shipment; the provider API expects their short
//! string forms.

use serde::{Deserialize, Serialize};

/// Distance unit for parcel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Cm,
    In,
    Ft,
    M,
    Mm,
    Yd,
}

impl DistanceUnit {
    /// The wire string the provider expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cm => "cm",
            Self::In => "in",
            Self::Ft => "ft",
            Self::M => "m",
            Self::Mm => "mm",
            Self::Yd => "yd",
        }
    }
}

/// Mass unit for parcel weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    #[default]
    Kg,
    G,
    Lb,
    Oz,
}

impl MassUnit {
    /// The wire string the provider expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::G => "g",
            Self::Lb => "lb",
            Self::Oz => "oz",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_wire_strings() {
        assert_eq!(DistanceUnit::Cm.as_str(), "cm");
        assert_eq!(MassUnit::Kg.as_str(), "kg");
    }

    #[test]
    fn test_unit_serde_lowercase() {
        let json = serde_json::to_string(&DistanceUnit::Cm).unwrap();
        assert_eq!(json, "\"cm\"");
        let json = serde_json::to_string(&MassUnit::Lb).unwrap();
        assert_eq!(json, "\"lb\"");
    }
}

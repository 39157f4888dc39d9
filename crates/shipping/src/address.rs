//! Address validation and normalization.
//!
//! Upstream address data is loosely typed: fields arrive optional, with
//! inconsistent spellings (`postalCode` vs `zip`) and stray whitespace. All
//! of that normalization lives in [`validate_address`], which produces the
//! single canonical [`Address`] shape. Loosely-typed data never flows past
//! this boundary into the packer or customs builder.

use serde::{Deserialize, Serialize};

use tidepool_core::CountryCode;

use crate::error::ShippingError;

/// Fields that must be non-empty after normalization, checked in order.
const REQUIRED_FIELDS: &[&str] = &["street1", "city", "country", "zip", "name"];

/// A loosely-typed address as received from upstream callers.
///
/// Every field is optional; `postal_code` is accepted as an alternate
/// spelling of `zip` and coerced during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAddress {
    pub name: Option<String>,
    pub company: Option<String>,
    pub street1: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    #[serde(alias = "postalCode")]
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A validated, canonical shipping address.
///
/// All optional fields are defaulted to empty strings rather than left
/// undefined; `state` may legitimately be empty for countries without
/// subdivisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub company: String,
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: CountryCode,
    pub phone: String,
    pub email: String,
}

/// Validate and coerce a loosely-typed address into a canonical [`Address`].
///
/// `source` is a human-readable label for where the address came from
/// (e.g., "Destination Address", "Shipping Origin: Acme Warehouse") and is
/// included in failure messages alongside the missing field name.
///
/// # Errors
///
/// Returns `ShippingError::MissingData` naming the source and the first
/// required field (`street1`, `city`, `country`, `zip`, `name`) that is
/// absent or empty after trimming.
pub fn validate_address(raw: &RawAddress, source: &str) -> Result<Address, ShippingError> {
    // Coerce postalCode into zip if zip is absent.
    let zip = raw
        .zip
        .as_deref()
        .filter(|z| !z.trim().is_empty())
        .or(raw.postal_code.as_deref());

    let trimmed = |value: &Option<String>| -> String {
        value.as_deref().unwrap_or_default().trim().to_string()
    };

    let candidate = Address {
        name: trimmed(&raw.name),
        company: trimmed(&raw.company),
        street1: trimmed(&raw.street1),
        street2: trimmed(&raw.street2),
        city: trimmed(&raw.city),
        state: trimmed(&raw.state),
        zip: zip.unwrap_or_default().trim().to_string(),
        country: CountryCode::new(raw.country.as_deref().unwrap_or_default()),
        phone: trimmed(&raw.phone),
        email: trimmed(&raw.email),
    };

    for field in REQUIRED_FIELDS {
        let present = match *field {
            "street1" => !candidate.street1.is_empty(),
            "city" => !candidate.city.is_empty(),
            "country" => !candidate.country.is_empty(),
            "zip" => !candidate.zip.is_empty(),
            "name" => !candidate.name.is_empty(),
            _ => true,
        };
        if !present {
            return Err(ShippingError::missing(format!(
                "{source}: missing required field '{field}'"
            )));
        }
    }

    Ok(candidate)
}

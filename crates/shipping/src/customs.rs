//! Customs declaration builder for cross-border shipments.
//!
//! Customs forms are legally binding, so this module enforces a strict
//! zero-fallback policy: it is better to fail the whole rate request than to
//! submit an incomplete declaration to a carrier. Domestic shipments (origin
//! country equals destination country) are the only non-error path that
//! skips declaration construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tidepool_core::{CountryCode, CurrencyCode, MassUnit};

use crate::address::Address;
use crate::error::ShippingError;
use crate::item::{Incoterm, ShippableItem};

/// Declared contents category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentsType {
    Merchandise,
    Gift,
    Documents,
    Sample,
    ReturnMerchandise,
}

/// What the carrier should do when the shipment cannot be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NonDeliveryOption {
    Return,
    Abandon,
}

/// One customs line item, one per distinct SKU (quantity preserved, not
/// instance-exploded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomsItem {
    pub description: String,
    pub quantity: u32,
    /// Line net weight (unit weight times quantity), as the provider's
    /// string-encoded decimal.
    pub net_weight: String,
    pub mass_unit: MassUnit,
    /// Declared line value, string-encoded.
    pub value_amount: String,
    pub value_currency: CurrencyCode,
    pub origin_country: CountryCode,
    /// Harmonized System tariff code, optional on the form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tariff_number: Option<String>,
}

/// A complete customs declaration for an international shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomsDeclaration {
    pub contents_type: ContentsType,
    pub contents_explanation: String,
    pub non_delivery_option: NonDeliveryOption,
    pub certify: bool,
    pub certify_signer: String,
    pub commercial_invoice: bool,
    pub incoterm: Incoterm,
    pub items: Vec<CustomsItem>,
}

/// Build a customs declaration, or `None` for domestic shipments.
///
/// Field sourcing: the contents explanation comes from the first shipped
/// product's configured export explanation, the signer is the origin contact
/// name, and each line item pulls its description, declared price, and
/// origin country from product metadata.
///
/// # Errors
///
/// Returns `ShippingError::MissingData` naming the offending SKU (or the
/// origin) when any required field is absent for a cross-border shipment.
pub fn prepare_declaration(
    origin: &Address,
    destination: &Address,
    items: &[ShippableItem],
    origin_incoterm: Incoterm,
    mass_unit: MassUnit,
) -> Result<Option<CustomsDeclaration>, ShippingError> {
    if destination.country == origin.country {
        return Ok(None);
    }

    if origin.name.trim().is_empty() {
        return Err(ShippingError::missing(
            "Shipping origin: missing contact name for customs certification".to_string(),
        ));
    }

    let contents_explanation = items
        .first()
        .and_then(|item| item.export_explanation.as_deref())
        .map(str::trim)
        .filter(|explanation| !explanation.is_empty())
        .ok_or_else(|| {
            let sku = items.first().map(|i| i.sku.to_string()).unwrap_or_default();
            ShippingError::missing(format!(
                "Product {sku}: missing export contents explanation"
            ))
        })?;

    let mut customs_items = Vec::with_capacity(items.len());
    for item in items {
        customs_items.push(customs_item(item, mass_unit)?);
    }

    Ok(Some(CustomsDeclaration {
        contents_type: ContentsType::Merchandise,
        contents_explanation: contents_explanation.to_string(),
        non_delivery_option: NonDeliveryOption::Return,
        certify: true,
        certify_signer: origin.name.clone(),
        commercial_invoice: true,
        incoterm: origin_incoterm,
        items: customs_items,
    }))
}

/// Build one customs line item, failing on any missing required field.
fn customs_item(item: &ShippableItem, mass_unit: MassUnit) -> Result<CustomsItem, ShippingError> {
    let description = item
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            ShippingError::missing(format!("Product {}: missing customs description", item.sku))
        })?;

    let price = item.unit_price.ok_or_else(|| {
        ShippingError::missing(format!(
            "Product {}: missing declared price for customs",
            item.sku
        ))
    })?;

    let origin_country = item
        .origin_country
        .clone()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            ShippingError::missing(format!("Product {}: missing origin country", item.sku))
        })?;

    let unit_weight = item.resolved_weight().ok_or_else(|| {
        ShippingError::missing(format!("Product {}: missing shipping weight", item.sku))
    })?;

    let net_weight = f64::from(item.quantity) * unit_weight;
    let line_value = price.amount * Decimal::from(item.quantity);

    Ok(CustomsItem {
        description: description.to_string(),
        quantity: item.quantity,
        net_weight: format!("{net_weight:.2}"),
        mass_unit,
        value_amount: line_value.to_string(),
        value_currency: price.currency_code,
        origin_country,
        tariff_number: item.hs_code.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use tidepool_core::{Price, Sku};

    fn address(name: &str, country: &str) -> Address {
        Address {
            name: name.to_string(),
            company: String::new(),
            street1: "1 Main St".to_string(),
            street2: String::new(),
            city: "Somewhere".to_string(),
            state: String::new(),
            zip: "00000".to_string(),
            country: CountryCode::new(country),
            phone: String::new(),
            email: String::new(),
        }
    }

    fn exportable_item(sku: &str) -> ShippableItem {
        ShippableItem {
            sku: Sku::new(sku),
            quantity: 2,
            variant_weight: Some(0.5),
            variant_dimensions: None,
            product_weight: None,
            product_dimensions: None,
            description: Some("Ceramic mug".to_string()),
            unit_price: Some(Price::new(dec!(18.00), CurrencyCode::CAD)),
            origin_country: Some(CountryCode::new("CA")),
            hs_code: Some("6912.00".to_string()),
            export_explanation: Some("Household ceramics".to_string()),
            shipping_origin: None,
        }
    }

    #[test]
    fn test_domestic_shipment_skips_declaration() {
        // Skip applies regardless of other field completeness.
        let item = ShippableItem {
            export_explanation: None,
            description: None,
            unit_price: None,
            ..exportable_item("MUG-01")
        };
        let declaration = prepare_declaration(
            &address("Acme Warehouse", "CA"),
            &address("Jo Tremblay", "ca"),
            &[item],
            Incoterm::Ddp,
            MassUnit::Kg,
        )
        .unwrap();
        assert!(declaration.is_none());
    }

    #[test]
    fn test_international_builds_complete_declaration() {
        let declaration = prepare_declaration(
            &address("Acme Warehouse", "CA"),
            &address("Sam Carter", "US"),
            &[exportable_item("MUG-01")],
            Incoterm::Ddu,
            MassUnit::Kg,
        )
        .unwrap()
        .unwrap();

        assert_eq!(declaration.contents_type, ContentsType::Merchandise);
        assert_eq!(declaration.contents_explanation, "Household ceramics");
        assert_eq!(declaration.non_delivery_option, NonDeliveryOption::Return);
        assert!(declaration.certify);
        assert_eq!(declaration.certify_signer, "Acme Warehouse");
        assert!(declaration.commercial_invoice);
        assert_eq!(declaration.incoterm, Incoterm::Ddu);

        assert_eq!(declaration.items.len(), 1);
        let line = declaration.items.first().unwrap();
        assert_eq!(line.description, "Ceramic mug");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.net_weight, "1.00");
        assert_eq!(line.value_amount, "36.00");
        assert_eq!(line.value_currency, CurrencyCode::CAD);
        assert_eq!(line.origin_country, CountryCode::new("CA"));
        assert_eq!(line.tariff_number.as_deref(), Some("6912.00"));
    }

    #[test]
    fn test_missing_export_explanation_fails() {
        let item = ShippableItem {
            export_explanation: None,
            ..exportable_item("MUG-01")
        };
        let err = prepare_declaration(
            &address("Acme Warehouse", "CA"),
            &address("Sam Carter", "US"),
            &[item],
            Incoterm::Ddp,
            MassUnit::Kg,
        )
        .unwrap_err();
        assert!(err.to_string().contains("export contents explanation"));
    }

    #[test]
    fn test_missing_origin_country_names_sku() {
        let item = ShippableItem {
            origin_country: None,
            ..exportable_item("TOTE-07")
        };
        let err = prepare_declaration(
            &address("Acme Warehouse", "CA"),
            &address("Sam Carter", "US"),
            &[item],
            Incoterm::Ddp,
            MassUnit::Kg,
        )
        .unwrap_err();
        assert!(err.to_string().contains("TOTE-07"));
        assert!(err.to_string().contains("origin country"));
    }

    #[test]
    fn test_missing_description_names_sku() {
        let item = ShippableItem {
            description: Some("   ".to_string()),
            ..exportable_item("TOTE-07")
        };
        let err = prepare_declaration(
            &address("Acme Warehouse", "CA"),
            &address("Sam Carter", "US"),
            &[item],
            Incoterm::Ddp,
            MassUnit::Kg,
        )
        .unwrap_err();
        assert!(err.to_string().contains("TOTE-07"));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_missing_price_names_sku() {
        let item = ShippableItem {
            unit_price: None,
            ..exportable_item("TOTE-07")
        };
        let err = prepare_declaration(
            &address("Acme Warehouse", "CA"),
            &address("Sam Carter", "US"),
            &[item],
            Incoterm::Ddp,
            MassUnit::Kg,
        )
        .unwrap_err();
        assert!(err.to_string().contains("TOTE-07"));
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_hs_code_is_optional() {
        let item = ShippableItem {
            hs_code: None,
            ..exportable_item("MUG-01")
        };
        let declaration = prepare_declaration(
            &address("Acme Warehouse", "CA"),
            &address("Sam Carter", "US"),
            &[item],
            Incoterm::Ddp,
            MassUnit::Kg,
        )
        .unwrap()
        .unwrap();
        assert!(declaration.items.first().unwrap().tariff_number.is_none());
    }
}

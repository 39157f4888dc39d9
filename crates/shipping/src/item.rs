//! Resolved catalog records and packable-item resolution.
//!
//! The calling layer (the Catalog Store collaborator) resolves carts into
//! [`ShippableItem`]s before the pipeline runs; this core never queries for
//! missing data. Absence of any shipping-critical field is a hard failure.

use serde::{Deserialize, Serialize};

use tidepool_core::{CountryCode, Price, Sku};

use crate::address::RawAddress;
use crate::error::ShippingError;

/// Physical dimensions of one unit, in the run's configured distance unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

impl Dimensions {
    /// Create dimensions.
    #[must_use]
    pub const fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            width,
            length,
            height,
        }
    }
}

/// International commercial term defining who pays import duties and taxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Incoterm {
    /// Delivered Duty Paid - the seller pays duties.
    Ddp,
    /// Delivered Duty Unpaid - the buyer pays duties.
    Ddu,
}

/// The shipping-origin location configured on a product.
///
/// `incoterm` stays optional here because it is upstream configuration that
/// may be absent; the orchestrator refuses to guess a default and fails the
/// request instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingOrigin {
    /// Human-readable location name (e.g., "Acme Warehouse"), used in
    /// address-validation failure messages.
    pub label: String,
    pub address: RawAddress,
    pub incoterm: Option<Incoterm>,
}

/// One shippable line resolved by the Catalog Store.
///
/// Physical data (`variant_*` / `product_*`) is resolved variant-first with
/// a product fallback. Customs fields (`description`, `unit_price`,
/// `origin_country`, `export_explanation`) are only required for
/// cross-border shipments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippableItem {
    pub sku: Sku,
    /// Count of identical units; positive.
    pub quantity: u32,

    // Physical data (variant-first, product fallback)
    pub variant_weight: Option<f64>,
    pub variant_dimensions: Option<Dimensions>,
    pub product_weight: Option<f64>,
    pub product_dimensions: Option<Dimensions>,

    // Customs data
    /// Translated product name, used as the customs line-item description.
    pub description: Option<String>,
    /// Declared value per unit, from variant pricing.
    pub unit_price: Option<Price>,
    /// Country of manufacture, from product metadata.
    pub origin_country: Option<CountryCode>,
    /// Harmonized System tariff code; optional on customs forms.
    pub hs_code: Option<String>,
    /// Product-level export contents explanation.
    pub export_explanation: Option<String>,

    /// Shipping-origin location configured on the parent product.
    pub shipping_origin: Option<ShippingOrigin>,
}

impl ShippableItem {
    /// Resolve the effective unit weight: variant if set, else product.
    #[must_use]
    pub fn resolved_weight(&self) -> Option<f64> {
        self.variant_weight.or(self.product_weight)
    }

    /// Resolve the effective dimensions: variant if set, else product.
    #[must_use]
    pub fn resolved_dimensions(&self) -> Option<Dimensions> {
        self.variant_dimensions.or(self.product_dimensions)
    }

    /// Build the packer input for this item.
    ///
    /// # Errors
    ///
    /// Returns `ShippingError::MissingData` naming the SKU if neither the
    /// variant nor the parent product yields a complete set of weight plus
    /// all three dimensions.
    pub fn packable(&self) -> Result<PackableItem, ShippingError> {
        let weight = self.resolved_weight().ok_or_else(|| {
            ShippingError::missing(format!("Product {}: missing shipping weight", self.sku))
        })?;
        let dimensions = self.resolved_dimensions().ok_or_else(|| {
            ShippingError::missing(format!("Product {}: missing shipping dimensions", self.sku))
        })?;

        Ok(PackableItem {
            id: self.sku.clone(),
            width: dimensions.width,
            length: dimensions.length,
            height: dimensions.height,
            weight,
            quantity: self.quantity,
        })
    }
}

/// One shippable unit type, as consumed by the packer.
///
/// Ephemeral: constructed per rate-calculation call, never persisted. An
/// item with quantity 3 becomes 3 individually-placed instances sharing one
/// `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackableItem {
    pub id: Sku,
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub weight: f64,
    pub quantity: u32,
}

impl PackableItem {
    /// Volume of a single unit.
    #[must_use]
    pub fn unit_volume(&self) -> f64 {
        self.width * self.length * self.height
    }
}

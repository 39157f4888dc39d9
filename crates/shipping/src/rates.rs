//! The shipping rate orchestrator.
//!
//! Runs the pipeline strictly in order - each step a potential hard-failure
//! point - so invalid input never reaches the paid, rate-limited provider
//! API: validate destination, resolve origin and incoterm, pack, map
//! parcels, build customs, call the provider, and (for the top-level entry
//! point) filter and rank the returned rates.

use tracing::error;

use crate::address::{RawAddress, validate_address};
use crate::config::ShippingConfig;
use crate::customs::{CustomsDeclaration, prepare_declaration};
use crate::error::ShippingError;
use crate::filter::filter_and_label_rates;
use crate::item::{PackableItem, ShippableItem};
use crate::packing::{PackedParcel, Packer};
use crate::provider::{ProviderParcel, RateProvider, Shipment, ShippingRate};

/// Everything produced by one rate calculation. Created fresh per call and
/// discarded after the rates are returned; nothing here is persisted by the
/// core.
#[derive(Debug, Clone)]
pub struct RateCalculation {
    /// Parcels in the provider's wire format.
    pub parcels: Vec<ProviderParcel>,
    /// Raw, unfiltered carrier rates.
    pub rates: Vec<ShippingRate>,
    /// Present only for cross-border shipments.
    pub customs_declaration: Option<CustomsDeclaration>,
    /// The packer's parcel breakdown (box choice and contents per parcel).
    pub packing: Vec<PackedParcel>,
}

/// Shipping rate pipeline over an injected rate provider.
#[derive(Debug, Clone)]
pub struct ShippingService<P> {
    provider: P,
    packer: Packer,
    config: ShippingConfig,
}

impl<P: RateProvider> ShippingService<P> {
    /// Create a service from a provider and static configuration.
    #[must_use]
    pub fn new(provider: P, config: ShippingConfig) -> Self {
        let packer = Packer::new(config.catalog.clone());
        Self {
            provider,
            packer,
            config,
        }
    }

    /// The injected rate provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Top-level entry point: calculate, then filter and rank.
    ///
    /// Returns at most one standard and one express option, sorted ascending
    /// by price.
    ///
    /// # Errors
    ///
    /// See [`Self::calculate_rates`].
    pub async fn get_shipping_rates(
        &self,
        destination: &RawAddress,
        items: &[ShippableItem],
    ) -> Result<Vec<ShippingRate>, ShippingError> {
        let calculation = self.calculate_rates(destination, items).await?;
        Ok(filter_and_label_rates(&self.config.filter, &calculation.rates))
    }

    /// Run the full pipeline and return the raw results.
    ///
    /// # Errors
    ///
    /// - `MissingData` for an empty item list, an invalid destination or
    ///   origin address, missing origin/incoterm configuration, missing
    ///   packaging data for a SKU, or missing customs data on a
    ///   cross-border shipment
    /// - `NoSuitableBox` when an item fits no catalog box
    /// - `Provider` when the external rate call fails (logged, propagated
    ///   unmodified, never retried here)
    pub async fn calculate_rates(
        &self,
        destination: &RawAddress,
        items: &[ShippableItem],
    ) -> Result<RateCalculation, ShippingError> {
        let first = items
            .first()
            .ok_or_else(|| ShippingError::missing("No shipping items found"))?;

        let mut destination = validate_address(destination, "Destination Address")?;
        destination.zip.retain(|c| !c.is_whitespace());

        // Origin and incoterm come from the first item's product
        // configuration; no default incoterm is ever assumed.
        let origin_config = first.shipping_origin.as_ref().ok_or_else(|| {
            ShippingError::missing(format!(
                "Product {}: missing shipping origin location",
                first.sku
            ))
        })?;
        let origin_label = format!("Shipping Origin: {}", origin_config.label);
        let origin = validate_address(&origin_config.address, &origin_label)?;
        let incoterm = origin_config.incoterm.ok_or_else(|| {
            ShippingError::missing(format!(
                "Shipping origin {}: missing incoterm configuration",
                origin_config.label
            ))
        })?;

        let packable: Vec<PackableItem> = items
            .iter()
            .map(ShippableItem::packable)
            .collect::<Result<_, _>>()?;

        let packing = self.packer.pack(&packable)?;
        if packing.is_empty() {
            // Items exist but nothing was packed; never silently quote zero
            // rates.
            return Err(ShippingError::NoSuitableBox {
                sku: first.sku.clone(),
            });
        }

        let parcels: Vec<ProviderParcel> = packing.iter().map(|p| self.wire_parcel(p)).collect();

        let customs_declaration =
            prepare_declaration(&origin, &destination, items, incoterm, self.config.mass_unit)?;

        let shipment = Shipment {
            address_from: origin,
            address_to: destination,
            parcels: parcels.clone(),
            customs_declaration: customs_declaration.clone(),
        };

        let rates = match self.provider.fetch_rates(&shipment).await {
            Ok(rates) => rates,
            Err(provider_error) => {
                error!(error = %provider_error, "Rate provider call failed");
                return Err(provider_error.into());
            }
        };

        Ok(RateCalculation {
            parcels,
            rates,
            customs_declaration,
            packing,
        })
    }

    /// Map a packed parcel to the provider's wire format, applying the
    /// configured units.
    fn wire_parcel(&self, parcel: &PackedParcel) -> ProviderParcel {
        ProviderParcel {
            width: parcel.width.to_string(),
            length: parcel.length.to_string(),
            height: parcel.height.to_string(),
            distance_unit: self.config.distance_unit,
            weight: parcel.weight.to_string(),
            mass_unit: self.config.mass_unit,
        }
    }
}

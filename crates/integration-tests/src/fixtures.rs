//! Shared fixtures for the integration tests.

use std::sync::Mutex;

use rust_decimal::dec;

use tidepool_core::{CountryCode, CurrencyCode, Price, Sku};
use tidepool_shipping::provider::{ProviderError, RateProvider, ServiceLevel, Shipment};
use tidepool_shipping::{Dimensions, Incoterm, RawAddress, ShippableItem, ShippingOrigin, ShippingRate};

/// In-memory rate provider. Returns canned rates and records every shipment
/// it receives so tests can assert on the wire payload.
#[derive(Default)]
pub struct RecordingProvider {
    pub canned_rates: Vec<ShippingRate>,
    pub shipments: Mutex<Vec<Shipment>>,
}

impl RecordingProvider {
    /// Provider that answers every request with the given rates.
    #[must_use]
    pub fn with_rates(canned_rates: Vec<ShippingRate>) -> Self {
        Self {
            canned_rates,
            shipments: Mutex::new(Vec::new()),
        }
    }

    /// The shipments received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn received(&self) -> Vec<Shipment> {
        self.shipments.lock().unwrap().clone()
    }
}

impl RateProvider for RecordingProvider {
    #[allow(clippy::unwrap_used)]
    async fn fetch_rates(&self, shipment: &Shipment) -> Result<Vec<ShippingRate>, ProviderError> {
        self.shipments.lock().unwrap().push(shipment.clone());
        Ok(self.canned_rates.clone())
    }
}

/// A canned carrier rate.
#[must_use]
pub fn carrier_rate(provider: &str, service: &str, amount: &str, currency: &str) -> ShippingRate {
    ShippingRate {
        object_id: format!("{provider}:{service}"),
        amount: amount.to_string(),
        currency: currency.to_string(),
        provider: provider.to_string(),
        servicelevel: ServiceLevel {
            name: service.to_string(),
            token: None,
        },
        duration_terms: None,
        estimated_days: Some(5),
        display_name: None,
        display_time: None,
    }
}

/// A complete Canadian destination address.
#[must_use]
pub fn montreal_destination() -> RawAddress {
    RawAddress {
        name: Some("Jo Tremblay".to_string()),
        street1: Some("4020 Rue Saint-Denis".to_string()),
        city: Some("Montreal".to_string()),
        state: Some("QC".to_string()),
        zip: Some("H2W 2M5".to_string()),
        country: Some("CA".to_string()),
        ..RawAddress::default()
    }
}

/// A warehouse origin in the given country, incoterm DDP.
#[must_use]
pub fn warehouse_origin(country: &str) -> ShippingOrigin {
    ShippingOrigin {
        label: "Acme Warehouse".to_string(),
        address: RawAddress {
            name: Some("Acme Warehouse".to_string()),
            street1: Some("100 Industry Ave".to_string()),
            city: Some("Toronto".to_string()),
            state: Some("ON".to_string()),
            zip: Some("M5V 1J2".to_string()),
            country: Some(country.to_string()),
            ..RawAddress::default()
        },
        incoterm: Some(Incoterm::Ddp),
    }
}

/// A fully-resolved shippable item with complete customs metadata.
#[must_use]
pub fn resolved_item(sku: &str, quantity: u32, origin_country: &str) -> ShippableItem {
    ShippableItem {
        sku: Sku::new(sku),
        quantity,
        variant_weight: Some(1.0),
        variant_dimensions: Some(Dimensions::new(30.0, 20.0, 10.0)),
        product_weight: None,
        product_dimensions: None,
        description: Some("Ceramic mug".to_string()),
        unit_price: Some(Price::new(dec!(18.00), CurrencyCode::CAD)),
        origin_country: Some(CountryCode::new("CA")),
        hs_code: Some("6912.00".to_string()),
        export_explanation: Some("Household ceramics".to_string()),
        shipping_origin: Some(warehouse_origin(origin_country)),
    }
}

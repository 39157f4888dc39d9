//! Rate provider boundary: trait, wire types, and the Shippo client.
//!
//! The provider accepts origin, destination, parcels, and an optional
//! customs declaration, and returns raw carrier rates. This core performs
//! exactly one provider call per rate calculation, does not retry, and
//! propagates provider failures unmodified. The request timeout configured
//! on the HTTP client is the pipeline's only cancellation point.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use tidepool_core::{DistanceUnit, MassUnit};

use crate::address::Address;
use crate::config::ShippoConfig;
use crate::customs::CustomsDeclaration;

/// Shippo API base URL.
const BASE_URL: &str = "https://api.goshippo.com";

/// Errors that can occur when talking to the rate provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the provider response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One parcel in the provider's wire format: dimensions and weight as
/// strings, units fixed by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderParcel {
    pub width: String,
    pub length: String,
    pub height: String,
    pub distance_unit: DistanceUnit,
    pub weight: String,
    pub mass_unit: MassUnit,
}

/// A shipment submitted for rate shopping.
#[derive(Debug, Clone, Serialize)]
pub struct Shipment {
    pub address_from: Address,
    pub address_to: Address,
    pub parcels: Vec<ProviderParcel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customs_declaration: Option<CustomsDeclaration>,
}

/// A carrier's named service tier on a rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLevel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// One carrier quote returned by the provider.
///
/// `display_name` and `display_time` are empty on raw rates and populated by
/// the rate filter after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    #[serde(default)]
    pub object_id: String,
    /// String-encoded decimal amount.
    pub amount: String,
    pub currency: String,
    pub provider: String,
    pub servicelevel: ServiceLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_time: Option<String>,
}

/// External rate-shopping API.
///
/// Implementations own transport, authentication, and timeout; retry policy
/// (if any) also lives behind this trait, never in the orchestrator.
pub trait RateProvider {
    /// Fetch raw carrier rates for a shipment.
    fn fetch_rates(
        &self,
        shipment: &Shipment,
    ) -> impl Future<Output = Result<Vec<ShippingRate>, ProviderError>> + Send;
}

/// Shippo REST API client.
#[derive(Clone)]
pub struct ShippoClient {
    client: reqwest::Client,
    base_url: String,
}

/// Response envelope for `POST /shipments`.
#[derive(Debug, Deserialize)]
struct ShipmentResponse {
    #[serde(default)]
    rates: Vec<ShippingRate>,
}

/// Request body: the shipment plus the synchronous-rating flag.
#[derive(Serialize)]
struct ShipmentRequest<'a> {
    #[serde(flatten)]
    shipment: &'a Shipment,
    /// Shippo rates synchronously when `async` is false.
    #[serde(rename = "async")]
    asynchronous: bool,
}

impl ShippoClient {
    /// Create a new Shippo client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &ShippoConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("ShippoToken {}", config.api_token.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ProviderError::Parse(format!("Invalid API token format: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (used by tests against a local server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl RateProvider for ShippoClient {
    #[instrument(skip(self, shipment), fields(parcels = shipment.parcels.len()))]
    async fn fetch_rates(&self, shipment: &Shipment) -> Result<Vec<ShippingRate>, ProviderError> {
        let url = format!("{}/shipments/", self.base_url);
        let body = ShipmentRequest {
            shipment,
            asynchronous: false,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ShipmentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(envelope.rates)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_deserializes_from_provider_payload() {
        let json = r#"{
            "object_id": "rate_1",
            "amount": "12.00",
            "currency": "CAD",
            "provider": "UPS",
            "servicelevel": {"name": "UPS Ground", "token": "ups_ground"},
            "duration_terms": "Delivery in 3 to 5 business days.",
            "estimated_days": 4
        }"#;
        let rate: ShippingRate = serde_json::from_str(json).unwrap();
        assert_eq!(rate.amount, "12.00");
        assert_eq!(rate.servicelevel.name, "UPS Ground");
        assert_eq!(rate.estimated_days, Some(4));
        assert!(rate.display_name.is_none());
    }

    #[test]
    fn test_rate_tolerates_missing_optional_fields() {
        let json = r#"{
            "amount": "9.50",
            "currency": "USD",
            "provider": "USPS",
            "servicelevel": {"name": "Priority Mail"}
        }"#;
        let rate: ShippingRate = serde_json::from_str(json).unwrap();
        assert_eq!(rate.object_id, "");
        assert!(rate.duration_terms.is_none());
        assert!(rate.estimated_days.is_none());
    }

    #[test]
    fn test_shipment_request_sets_async_false() {
        let shipment = Shipment {
            address_from: test_address(),
            address_to: test_address(),
            parcels: vec![],
            customs_declaration: None,
        };
        let body = ShipmentRequest {
            shipment: &shipment,
            asynchronous: false,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value.get("async"), Some(&serde_json::Value::Bool(false)));
        // Absent customs declarations are omitted entirely, not sent as null.
        assert!(value.get("customs_declaration").is_none());
    }

    fn test_address() -> Address {
        Address {
            name: "X".to_string(),
            company: String::new(),
            street1: "1 Main".to_string(),
            street2: String::new(),
            city: "Town".to_string(),
            state: String::new(),
            zip: "12345".to_string(),
            country: tidepool_core::CountryCode::new("US"),
            phone: String::new(),
            email: String::new(),
        }
    }
}

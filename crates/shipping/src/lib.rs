//! Tidepool Shipping - rate calculation core.
//!
//! Turns a normalized list of shippable items and a destination address into
//! a ranked list of shipping options. The pipeline runs strictly in order:
//! address validation, origin/incoterm resolution, 3D bin packing, customs
//! declaration, one rate-provider call, then rate filtering/classification.
//! Invalid input never reaches the paid external API.
//!
//! # Architecture
//!
//! - Pure, synchronous computation everywhere except the single provider
//!   call ([`provider::RateProvider::fetch_rates`])
//! - All configuration (box catalog, filter keywords, units, exchange rates)
//!   is dependency-injected; no ambient global state
//! - Zero-fallback policy: missing shipping-critical data fails the whole
//!   request rather than producing a best-effort quote. The one exception is
//!   a currency-conversion failure during filtering, which drops the single
//!   affected rate.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidepool_shipping::config::ShippoConfig;
//! use tidepool_shipping::{ShippingConfig, ShippingService, ShippoClient};
//!
//! let provider = ShippoClient::new(&ShippoConfig::from_env()?)?;
//! let service = ShippingService::new(provider, ShippingConfig::default());
//!
//! let rates = service.get_shipping_rates(&destination, &items).await?;
//! for rate in rates {
//!     println!("{}: {} {}", rate.display_name.unwrap_or_default(), rate.amount, rate.currency);
//! }
//! ```
//!
//! # Modules
//!
//! - [`address`] - Loose-to-canonical address validation
//! - [`config`] - Injected configuration (catalog, filter, units, provider)
//! - [`customs`] - Customs declaration builder for cross-border shipments
//! - [`error`] - Error taxonomy
//! - [`filter`] - Rate allow-listing, currency normalization, tier selection
//! - [`item`] - Resolved catalog records and packable-item resolution
//! - [`packing`] - 3D bin packing against the box catalog
//! - [`provider`] - Rate provider trait, wire types, and the Shippo client
//! - [`rates`] - The orchestrating `ShippingService`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod config;
pub mod customs;
pub mod error;
pub mod filter;
pub mod item;
pub mod packing;
pub mod provider;
pub mod rates;

pub use address::{Address, RawAddress, validate_address};
pub use config::ShippingConfig;
pub use customs::{CustomsDeclaration, CustomsItem, prepare_declaration};
pub use error::ShippingError;
pub use filter::{RateFilterConfig, TierRule, filter_and_label_rates};
pub use item::{Dimensions, Incoterm, PackableItem, ShippableItem, ShippingOrigin};
pub use packing::{BoxCatalog, BoxSpec, PackedParcel, Packer};
pub use provider::{ProviderError, RateProvider, ShippingRate, ShippoClient};
pub use rates::{RateCalculation, ShippingService};

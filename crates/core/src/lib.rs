//! Tidepool Core - Shared types library.
//!
//! This crate provides common types used across all Tidepool components:
//! - `shipping` - Rate calculation, packing, and customs
//! - `integration-tests` - End-to-end pipeline tests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for SKUs, countries, prices, and units

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Integration tests for Tidepool.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tidepool-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shipping_pipeline` - Full rate-calculation runs against an in-memory
//!   rate provider: packing, customs, provider wire format, and filtering
//!   together
//!
//! The crate itself only hosts shared fixtures; the tests live in `tests/`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod fixtures;

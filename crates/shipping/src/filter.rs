//! Rate filtering, currency normalization, and service-tier classification.
//!
//! Post-processes raw carrier rates in four passes: provider allow-listing,
//! conversion to the site display currency, keyword classification into
//! standard/express tiers, and cheapest-per-tier selection. Pure and
//! deterministic given configuration.
//!
//! A currency-conversion failure is the one locally-recovered error in the
//! whole pipeline: the affected rate is dropped with a warning so a single
//! bad quote cannot block checkout when other valid rates exist.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use tidepool_core::{CurrencyCode, ExchangeRates};

use crate::provider::ShippingRate;

/// Classification rule for one service tier.
///
/// A service-level name (lower-cased) qualifies when it contains any
/// `include` keyword and none of the `exclude` keywords.
#[derive(Debug, Clone)]
pub struct TierRule {
    /// Display label applied to the surviving rate (e.g., "Standard Shipping").
    pub label: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl TierRule {
    /// Whether a lower-cased service-level name qualifies for this tier.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.include.iter().any(|k| name.contains(k.as_str()))
            && !self.exclude.iter().any(|k| name.contains(k.as_str()))
    }
}

/// Configuration for the rate filter.
#[derive(Debug, Clone)]
pub struct RateFilterConfig {
    /// The site's display currency; every surviving rate is normalized to it.
    pub site_currency: CurrencyCode,
    /// Provider allow-list, matched case-insensitively as substrings. Empty
    /// means all providers are allowed.
    pub allowed_providers: Vec<String>,
    pub standard: TierRule,
    pub express: TierRule,
    pub exchange_rates: ExchangeRates,
}

impl Default for RateFilterConfig {
    fn default() -> Self {
        let site_currency = CurrencyCode::CAD;
        Self {
            site_currency,
            allowed_providers: Vec::new(),
            standard: TierRule {
                label: "Standard Shipping".to_string(),
                include: vec![
                    "ground".to_string(),
                    "standard".to_string(),
                    "surepost".to_string(),
                ],
                exclude: vec!["express".to_string()],
            },
            express: TierRule {
                label: "Express Shipping".to_string(),
                include: vec![
                    "express".to_string(),
                    "expedited".to_string(),
                    "priority".to_string(),
                ],
                exclude: Vec::new(),
            },
            exchange_rates: ExchangeRates::new(site_currency),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Standard,
    Express,
}

/// Filter, normalize, classify, and label raw carrier rates.
///
/// Returns at most one standard and one express rate (the cheapest of each
/// tier by converted amount), sorted ascending by price. Stable under
/// repeated application to its own output.
#[must_use]
pub fn filter_and_label_rates(
    config: &RateFilterConfig,
    raw_rates: &[ShippingRate],
) -> Vec<ShippingRate> {
    let mut cheapest_standard: Option<(Decimal, ShippingRate)> = None;
    let mut cheapest_express: Option<(Decimal, ShippingRate)> = None;

    for rate in raw_rates {
        if !provider_allowed(config, &rate.provider) {
            debug!(provider = %rate.provider, "Rate dropped by provider allow-list");
            continue;
        }

        let Some((amount, normalized)) = normalize_currency(config, rate) else {
            continue;
        };

        let name = normalized.servicelevel.name.to_lowercase();
        let tier = if config.standard.matches(&name) {
            Tier::Standard
        } else if config.express.matches(&name) {
            Tier::Express
        } else {
            debug!(service = %normalized.servicelevel.name, "Rate matched no tier, dropped");
            continue;
        };

        let slot = match tier {
            Tier::Standard => &mut cheapest_standard,
            Tier::Express => &mut cheapest_express,
        };
        // Strictly-cheaper replacement keeps the first of equal-priced rates.
        if slot.as_ref().is_none_or(|(best, _)| amount < *best) {
            *slot = Some((amount, normalized));
        }
    }

    let mut survivors: Vec<(Decimal, ShippingRate)> = Vec::with_capacity(2);
    if let Some((amount, rate)) = cheapest_standard {
        survivors.push((amount, label_rate(rate, &config.standard.label)));
    }
    if let Some((amount, rate)) = cheapest_express {
        survivors.push((amount, label_rate(rate, &config.express.label)));
    }

    survivors.sort_by(|a, b| a.0.cmp(&b.0));
    survivors.into_iter().map(|(_, rate)| rate).collect()
}

/// Case-insensitive substring match against the allow-list; an empty list
/// allows everything.
fn provider_allowed(config: &RateFilterConfig, provider: &str) -> bool {
    if config.allowed_providers.is_empty() {
        return true;
    }
    let provider = provider.to_lowercase();
    config
        .allowed_providers
        .iter()
        .any(|allowed| provider.contains(&allowed.to_lowercase()))
}

/// Parse the rate amount and convert it to the site currency.
///
/// Returns `None` (and logs a warning) on any parse or conversion failure -
/// the single bad rate is dropped rather than failing the whole quote.
fn normalize_currency(
    config: &RateFilterConfig,
    rate: &ShippingRate,
) -> Option<(Decimal, ShippingRate)> {
    let amount: Decimal = match rate.amount.parse() {
        Ok(amount) => amount,
        Err(error) => {
            warn!(amount = %rate.amount, %error, "Rate dropped: unparseable amount");
            return None;
        }
    };

    let currency: CurrencyCode = match rate.currency.parse() {
        Ok(currency) => currency,
        Err(error) => {
            warn!(currency = %rate.currency, %error, "Rate dropped: unknown currency");
            return None;
        }
    };

    if currency == config.site_currency {
        return Some((amount, rate.clone()));
    }

    match config
        .exchange_rates
        .convert(amount, currency, config.site_currency)
    {
        Ok(converted) => {
            let converted = converted.round_dp(2);
            let mut normalized = rate.clone();
            normalized.amount = format!("{converted:.2}");
            normalized.currency = config.site_currency.code().to_string();
            Some((converted, normalized))
        }
        Err(error) => {
            warn!(
                currency = %currency,
                site_currency = %config.site_currency,
                %error,
                "Rate dropped: currency conversion failed"
            );
            None
        }
    }
}

/// Apply the tier display label and derive the display time.
fn label_rate(mut rate: ShippingRate, label: &str) -> ShippingRate {
    rate.display_name = Some(label.to_string());
    rate.display_time = rate
        .duration_terms
        .as_deref()
        .map(str::trim)
        .filter(|terms| !terms.is_empty())
        .map(ToString::to_string)
        .or_else(|| {
            rate.estimated_days
                .map(|days| format!("{days} business days"))
        });
    rate
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    use crate::provider::ServiceLevel;

    fn rate(provider: &str, service: &str, amount: &str, currency: &str) -> ShippingRate {
        ShippingRate {
            object_id: format!("{provider}-{service}"),
            amount: amount.to_string(),
            currency: currency.to_string(),
            provider: provider.to_string(),
            servicelevel: ServiceLevel {
                name: service.to_string(),
                token: None,
            },
            duration_terms: None,
            estimated_days: None,
            display_name: None,
            display_time: None,
        }
    }

    fn config_with_allow_list(allowed: &[&str]) -> RateFilterConfig {
        RateFilterConfig {
            allowed_providers: allowed.iter().map(ToString::to_string).collect(),
            ..RateFilterConfig::default()
        }
    }

    #[test]
    fn test_allow_list_classification_and_sort() {
        let config = config_with_allow_list(&["ups"]);
        let raw = vec![
            rate("ups", "UPS Ground", "12.00", "CAD"),
            rate("ups", "UPS Express Saver", "25.00", "CAD"),
            rate("dhl", "DHL Ground", "9.00", "CAD"),
        ];

        let filtered = filter_and_label_rates(&config, &raw);

        assert_eq!(filtered.len(), 2);
        let first = filtered.first().unwrap();
        let second = filtered.last().unwrap();
        assert_eq!(first.amount, "12.00");
        assert_eq!(first.display_name.as_deref(), Some("Standard Shipping"));
        assert_eq!(second.amount, "25.00");
        assert_eq!(second.display_name.as_deref(), Some("Express Shipping"));
    }

    #[test]
    fn test_empty_allow_list_allows_all_providers() {
        let config = RateFilterConfig::default();
        let raw = vec![rate("dhl", "DHL Ground", "9.00", "CAD")];
        let filtered = filter_and_label_rates(&config, &raw);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_cheapest_per_tier_wins() {
        let config = RateFilterConfig::default();
        let raw = vec![
            rate("ups", "UPS Ground", "14.00", "CAD"),
            rate("canada post", "Standard Parcel", "11.50", "CAD"),
            rate("purolator", "Ground", "13.20", "CAD"),
        ];

        let filtered = filter_and_label_rates(&config, &raw);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().amount, "11.50");
    }

    #[test]
    fn test_unclassified_rates_are_dropped() {
        let config = RateFilterConfig::default();
        let raw = vec![rate("ups", "UPS Freight LTL", "80.00", "CAD")];
        let filtered = filter_and_label_rates(&config, &raw);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_currency_conversion_to_site_currency() {
        // 1 CAD = 0.74 USD
        let config = RateFilterConfig {
            exchange_rates: ExchangeRates::new(CurrencyCode::CAD)
                .with_rate(CurrencyCode::USD, dec!(0.74)),
            ..RateFilterConfig::default()
        };

        let raw = vec![rate("usps", "Ground Advantage", "7.40", "USD")];
        let filtered = filter_and_label_rates(&config, &raw);

        assert_eq!(filtered.len(), 1);
        let converted = filtered.first().unwrap();
        assert_eq!(converted.amount, "10.00");
        assert_eq!(converted.currency, "CAD");
    }

    #[test]
    fn test_conversion_failure_drops_only_that_rate() {
        // No GBP rate configured: the GBP quote drops, the CAD one survives.
        let config = RateFilterConfig::default();
        let raw = vec![
            rate("royal mail", "International Standard", "8.00", "GBP"),
            rate("ups", "UPS Ground", "12.00", "CAD"),
        ];

        let filtered = filter_and_label_rates(&config, &raw);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().provider, "ups");
    }

    #[test]
    fn test_unknown_currency_drops_rate() {
        let config = RateFilterConfig::default();
        let raw = vec![rate("ups", "UPS Ground", "1200.00", "JPY")];
        let filtered = filter_and_label_rates(&config, &raw);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_exclusion_keywords_apply() {
        // "express" is excluded from the standard tier, so this can only
        // classify as express even though "standard" also appears.
        let config = RateFilterConfig::default();
        let raw = vec![rate("fedex", "Standard Express", "20.00", "CAD")];
        let filtered = filter_and_label_rates(&config, &raw);
        assert_eq!(filtered.len(), 1);
        assert_eq!(
            filtered.first().unwrap().display_name.as_deref(),
            Some("Express Shipping")
        );
    }

    #[test]
    fn test_display_time_from_duration_terms() {
        let config = RateFilterConfig::default();
        let mut quote = rate("ups", "UPS Ground", "12.00", "CAD");
        quote.duration_terms = Some("Delivery in 3 to 5 business days.".to_string());
        quote.estimated_days = Some(4);

        let filtered = filter_and_label_rates(&config, &[quote]);
        assert_eq!(
            filtered.first().unwrap().display_time.as_deref(),
            Some("Delivery in 3 to 5 business days.")
        );
    }

    #[test]
    fn test_display_time_falls_back_to_estimated_days() {
        let config = RateFilterConfig::default();
        let mut quote = rate("ups", "UPS Ground", "12.00", "CAD");
        quote.estimated_days = Some(4);

        let filtered = filter_and_label_rates(&config, &[quote]);
        assert_eq!(
            filtered.first().unwrap().display_time.as_deref(),
            Some("4 business days")
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let config = config_with_allow_list(&["ups", "canada post"]);
        let raw = vec![
            rate("ups", "UPS Ground", "12.00", "CAD"),
            rate("ups", "UPS Express Saver", "25.00", "CAD"),
            rate("canada post", "Xpresspost", "18.00", "CAD"),
        ];

        let once = filter_and_label_rates(&config, &raw);
        let twice = filter_and_label_rates(&config, &once);
        assert_eq!(once, twice);
    }
}

//! Exchange rates to the base currency.
//!
//! The engine only ever asks one question: how many units of the base
//! currency does one unit of `currency` buy today. The answer is frozen on
//! the expense at write time.

use std::{collections::HashMap, fmt, time::Duration};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{Currency, EngineError, ResultEngine};

/// Source of exchange rates to [`Currency::base`].
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync + fmt::Debug {
    /// Rate converting one unit of `currency` into the base currency.
    async fn rate_to_base(&self, currency: &Currency) -> ResultEngine<Decimal>;
}

/// Rates served from a static table, keyed by currency code.
///
/// Unknown currencies fail with [`EngineError::ExchangeRate`].
#[derive(Clone, Debug, Default)]
pub struct FixedRates {
    rates: HashMap<String, Decimal>,
}

impl FixedRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> Self {
        self.rates.insert(currency.code().to_string(), rate);
        self
    }
}

#[async_trait]
impl ExchangeRateProvider for FixedRates {
    async fn rate_to_base(&self, currency: &Currency) -> ResultEngine<Decimal> {
        self.rates.get(currency.code()).copied().ok_or_else(|| {
            EngineError::ExchangeRate(format!(
                "no rate configured for {} to {}",
                currency.code(),
                Currency::BASE_CODE
            ))
        })
    }
}

pub const FRANKFURTER_URL: &str = "https://api.frankfurter.dev/v1";

/// Rates from a Frankfurter-compatible HTTP API (ECB reference rates).
#[derive(Clone, Debug)]
pub struct FrankfurterRates {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, Decimal>,
}

impl FrankfurterRates {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ResultEngine<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| EngineError::ExchangeRate(format!("http client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn latest_url(&self, currency: &Currency) -> String {
        format!(
            "{}/latest?from={}&to={}",
            self.base_url.trim_end_matches('/'),
            currency.code(),
            Currency::BASE_CODE
        )
    }
}

fn base_rate(body: LatestRates) -> ResultEngine<Decimal> {
    body.rates.get(Currency::BASE_CODE).copied().ok_or_else(|| {
        EngineError::ExchangeRate(format!("response has no {} rate", Currency::BASE_CODE))
    })
}

#[async_trait]
impl ExchangeRateProvider for FrankfurterRates {
    async fn rate_to_base(&self, currency: &Currency) -> ResultEngine<Decimal> {
        let url = self.latest_url(currency);
        tracing::debug!("fetching exchange rate: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| {
                tracing::warn!("exchange rate request failed: {err}");
                EngineError::ExchangeRate(format!("{} lookup failed", currency.code()))
            })?;

        let body: LatestRates = response.json().await.map_err(|err| {
            tracing::warn!("exchange rate response malformed: {err}");
            EngineError::ExchangeRate(format!("{} lookup failed", currency.code()))
        })?;
        base_rate(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        Currency::try_from("USD").unwrap()
    }

    #[tokio::test]
    async fn fixed_rates_answer_known_currencies() {
        let rates = FixedRates::new().with_rate(usd(), Decimal::new(135, 2));
        assert_eq!(rates.rate_to_base(&usd()).await.unwrap(), Decimal::new(135, 2));
    }

    #[tokio::test]
    async fn fixed_rates_reject_unknown_currencies() {
        let err = FixedRates::new()
            .rate_to_base(&Currency::try_from("EUR").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::ExchangeRate(_)));
    }

    #[test]
    fn frankfurter_url_targets_base_currency() {
        let rates = FrankfurterRates::new("http://rates.local/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            rates.latest_url(&usd()),
            "http://rates.local/v1/latest?from=USD&to=CAD"
        );
    }

    #[test]
    fn frankfurter_body_yields_base_rate() {
        let body: LatestRates = serde_json::from_str(
            r#"{"amount":1.0,"base":"USD","date":"2023-05-01","rates":{"CAD":1.3542}}"#,
        )
        .unwrap();
        assert_eq!(base_rate(body).unwrap(), Decimal::new(13542, 4));

        let body: LatestRates = serde_json::from_str(r#"{"rates":{}}"#).unwrap();
        assert!(base_rate(body).is_err());
    }
}

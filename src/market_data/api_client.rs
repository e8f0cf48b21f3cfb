use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use governor::{Quota, DefaultDirectRateLimiter};
use nonzero_ext::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::types::{Instrument, PricePoint};

/// Hard ceiling on one quote round trip
const QUOTE_TIMEOUT: Duration = Duration::from_secs(5);

struct QuoteRateLimiter {
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl reqwest_ratelimit::RateLimiter for QuoteRateLimiter {
    async fn acquire_permit(&self) {
        self.rate_limiter.until_ready().await;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("quote request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("quote response rejected: {0}")]
    Response(#[from] reqwest_middleware::reqwest::Error),
    #[error("quote response missing {field} for {symbol}")]
    MissingField { symbol: String, field: &'static str },
    #[error("invalid quote endpoint URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("failed to encode quote query: {0}")]
    Query(#[from] serde_url_params::Error),
}

/// Query parameters for the simple-price endpoint
#[derive(Debug, Serialize)]
struct SimplePriceRequest<'a> {
    ids: &'a str,
    vs_currencies: &'a str,
    include_24hr_change: bool,
}

/// One instrument's entry in the simple-price response
#[derive(Debug, Deserialize)]
struct SimplePriceQuote {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PriceApiClient {
    http_client: ClientWithMiddleware,
    base_url: String,
}

impl PriceApiClient {
    pub fn new(base_url: String) -> Self {
        let reqwest_client = reqwest_middleware::reqwest::Client::builder()
            .timeout(QUOTE_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(300), Duration::from_millis(800))
            .build_with_max_retries(2);

        let rate_limiter = QuoteRateLimiter {
            rate_limiter: Arc::new(DefaultDirectRateLimiter::direct(Quota::per_second(nonzero!(2u32)))),
        };

        let http_client = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .with(reqwest_ratelimit::all(rate_limiter))
            .build();

        Self { http_client, base_url }
    }

    /// Fetch the current USD price and 24h change for one instrument
    #[instrument(skip(self))]
    pub async fn fetch_quote(&self, instrument: &Instrument) -> Result<PricePoint, MarketDataError> {
        let request = SimplePriceRequest {
            ids: instrument.quote_id,
            vs_currencies: "usd",
            include_24hr_change: true,
        };
        let query_string = serde_url_params::to_string(&request)?;
        let url = Url::parse(&format!("{}/simple/price?{}", self.base_url, query_string))?;

        let response = self.http_client.get(url).send().await?.error_for_status()?;
        let mut quotes: HashMap<String, SimplePriceQuote> = response.json().await?;

        let quote = quotes
            .remove(instrument.quote_id)
            .ok_or_else(|| MarketDataError::MissingField {
                symbol: instrument.symbol.to_string(),
                field: "quote",
            })?;
        let price = quote.usd.ok_or_else(|| MarketDataError::MissingField {
            symbol: instrument.symbol.to_string(),
            field: "usd",
        })?;
        let change_24h = quote.usd_24h_change.ok_or_else(|| MarketDataError::MissingField {
            symbol: instrument.symbol.to_string(),
            field: "usd_24h_change",
        })?;

        debug!(symbol = instrument.symbol, price, change_24h, "Quote fetched");

        Ok(PricePoint {
            symbol: instrument.symbol.to_string(),
            price,
            change_24h,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_matches_endpoint_contract() {
        let request = SimplePriceRequest {
            ids: "bitcoin",
            vs_currencies: "usd",
            include_24hr_change: true,
        };
        assert_eq!(
            serde_url_params::to_string(&request).unwrap(),
            "ids=bitcoin&vs_currencies=usd&include_24hr_change=true"
        );
    }

    #[test]
    fn response_body_deserializes_per_quote_id() {
        let body = r#"{"bitcoin": {"usd": 43250.12, "usd_24h_change": 1.87}}"#;
        let quotes: HashMap<String, SimplePriceQuote> = serde_json::from_str(body).unwrap();

        let quote = quotes.get("bitcoin").unwrap();
        assert_eq!(quote.usd, Some(43250.12));
        assert_eq!(quote.usd_24h_change, Some(1.87));
    }

    #[test]
    fn partial_quotes_leave_fields_unset() {
        let body = r#"{"bitcoin": {"usd": 43250.12}}"#;
        let quotes: HashMap<String, SimplePriceQuote> = serde_json::from_str(body).unwrap();
        assert!(quotes.get("bitcoin").unwrap().usd_24h_change.is_none());
    }
}

//! Common market-data request contract.
//!
//! Every provider client wraps one of these: a reqwest client threaded
//! through a rate limiter, built around a GET-with-query-params shape
//! and instrumented with `tracing` spans around the round trip.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::CashFlowError;
use crate::marketdata::rate_limit::RateLimiter;

/// Shared configuration + transport for one upstream provider.
pub struct MarketDataClient {
    http: Client,
    rate_limiter: RateLimiter,
    base_url: String,
    api_key: Option<String>,
    endpoint_name: String,
}

impl MarketDataClient {
    pub fn new(endpoint_name: impl Into<String>, base_url: impl Into<String>, api_key: Option<String>, rate_limit_per_sec: f64, timeout_secs: u64) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("reqwest client builds with a plain timeout");

        Self {
            http,
            rate_limiter: RateLimiter::new(rate_limit_per_sec),
            base_url: base_url.into(),
            api_key,
            endpoint_name: endpoint_name.into(),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_name(&self) -> &str {
        &self.endpoint_name
    }

    /// Acquires a rate-limit token, issues the GET, and decodes the JSON
    /// body into `T`. Non-2xx responses become a typed [`CashFlowError::Upstream`]
    /// carrying the status and a fragment of the raw body.
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint_name))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, CashFlowError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CashFlowError::upstream(&self.endpoint_name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let fragment: String = body.chars().take(200).collect();
            tracing::warn!(%status, %fragment, "upstream returned non-2xx");
            return Err(CashFlowError::upstream(
                &self.endpoint_name,
                format!("status {status}: {fragment}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CashFlowError::upstream(&self.endpoint_name, format!("decode failure: {e}")))
    }
}

/// Strips a known exchange suffix (e.g. `.AU`). Shared helper so EODHD's
/// identity reconciliation and ASX's path construction agree on what
/// "the base ticker" means.
pub fn strip_suffix(ticker: &str, suffix: &str) -> String {
    ticker.strip_suffix(suffix).unwrap_or(ticker).to_string()
}

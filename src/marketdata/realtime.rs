//! Real-time single-ticker quote client.

use chrono::Utc;
use serde::Deserialize;

use crate::error::CashFlowError;
use crate::marketdata::client::{strip_suffix, MarketDataClient};
use crate::marketdata::model::RealTimeQuote;
use crate::marketdata::numeric::FlexFloat;

#[derive(Debug, Deserialize)]
struct RealTimeRow {
    #[serde(default)]
    code: String,
    #[serde(default)]
    open: FlexFloat,
    #[serde(default)]
    high: FlexFloat,
    #[serde(default)]
    low: FlexFloat,
    #[serde(default)]
    close: FlexFloat,
    #[serde(default)]
    volume: FlexFloat,
    #[serde(default)]
    change: FlexFloat,
    #[serde(default)]
    change_p: FlexFloat,
}

/// An empty response code disables validation. A non-empty code is
/// accepted under the same identity rules as the EOD bulk reconciliation
/// (`eodhd::row_matches`): an exact match, or a match against the base of
/// `requested` with its exchange suffix stripped (e.g. `"BHP"` for a
/// requested `"BHP.AU"`). Anything else is fatal.
fn validate_code(endpoint_name: &str, requested: &str, response_code: &str) -> Result<(), CashFlowError> {
    let matches = response_code.is_empty()
        || response_code == requested
        || match requested.rfind('.') {
            Some(dot) => response_code == strip_suffix(requested, &requested[dot..]),
            None => false,
        };

    if matches {
        Ok(())
    } else {
        Err(CashFlowError::upstream(
            endpoint_name,
            format!("requested '{requested}' but got quote for '{response_code}'"),
        ))
    }
}

pub struct RealTimeClient {
    client: MarketDataClient,
}

impl RealTimeClient {
    pub fn new(client: MarketDataClient) -> Self {
        Self { client }
    }

    /// Fetches one ticker's latest quote. An empty `code` in the response
    /// disables identity validation (the provider occasionally omits it);
    /// a non-empty code that doesn't match `ticker` is a fatal error.
    pub async fn fetch(&self, ticker: &str) -> Result<RealTimeQuote, CashFlowError> {
        let mut query: Vec<(&str, &str)> = vec![("fmt", "json")];
        if let Some(key) = self.client.api_key() {
            query.push(("api_token", key));
        }

        let row: RealTimeRow = self.client.get_json(&format!("/real-time/{ticker}"), &query).await?;
        validate_code(self.client.endpoint_name(), ticker, &row.code)?;

        Ok(RealTimeQuote {
            code: ticker.to_string(),
            timestamp: Utc::now(),
            last: row.close.0,
            open: row.open.0,
            high: row.high.0,
            low: row.low.0,
            volume: row.volume.0,
            change: row.change.0,
            change_percent: row.change_p.0,
            source: self.client.endpoint_name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_passes_validation() {
        assert!(validate_code("eodhd", "BHP.AU", "").is_ok());
    }

    #[test]
    fn matching_code_passes_validation() {
        assert!(validate_code("eodhd", "BHP.AU", "BHP.AU").is_ok());
    }

    #[test]
    fn mismatched_code_is_fatal() {
        assert!(validate_code("eodhd", "BHP.AU", "CBA.AU").is_err());
    }

    #[test]
    fn suffix_stripped_base_code_passes_validation() {
        assert!(validate_code("eodhd", "BHP.AU", "BHP").is_ok());
    }
}

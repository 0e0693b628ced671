//! ASX public-header client.
//!
//! No API token. Only the fields the public header endpoint reliably
//! returns are parsed (last, change, change-percent, volume); every
//! other field in the uniform [`RealTimeQuote`] defaults to 0.

use chrono::Utc;
use serde::Deserialize;

use crate::error::CashFlowError;
use crate::marketdata::client::{strip_suffix, MarketDataClient};
use crate::marketdata::model::RealTimeQuote;
use crate::marketdata::numeric::FlexFloat;

const ASX_SUFFIX: &str = ".AU";

#[derive(Debug, Deserialize)]
struct AsxRow {
    #[serde(default)]
    last_price: FlexFloat,
    #[serde(default)]
    change_price: FlexFloat,
    #[serde(default)]
    change_in_percent: FlexFloat,
    #[serde(default)]
    volume: FlexFloat,
}

pub struct AsxClient {
    client: MarketDataClient,
}

impl AsxClient {
    pub fn new(client: MarketDataClient) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, ticker: &str) -> Result<RealTimeQuote, CashFlowError> {
        let base = strip_suffix(ticker, ASX_SUFFIX).to_lowercase();
        let row: AsxRow = self.client.get_json(&format!("/asx/{base}/header"), &[]).await?;

        Ok(RealTimeQuote {
            code: ticker.to_string(),
            timestamp: Utc::now(),
            last: row.last_price.0,
            open: 0.0,
            high: 0.0,
            low: 0.0,
            volume: row.volume.0,
            change: row.change_price.0,
            change_percent: row.change_in_percent.0,
            source: self.client.endpoint_name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_suffix_and_lowercases() {
        let base = strip_suffix("BHP.AU", ASX_SUFFIX).to_lowercase();
        assert_eq!(base, "bhp");
    }
}

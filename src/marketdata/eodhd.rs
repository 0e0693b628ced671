//! EODHD bulk end-of-day client.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::CashFlowError;
use crate::marketdata::client::{strip_suffix, MarketDataClient};
use crate::marketdata::model::MarketBar;
use crate::marketdata::numeric::FlexFloat;

#[derive(Debug, Deserialize)]
struct EodhdRow {
    code: String,
    #[serde(default)]
    exchange_short_name: Option<String>,
    date: NaiveDate,
    #[serde(default)]
    open: FlexFloat,
    #[serde(default)]
    high: FlexFloat,
    #[serde(default)]
    low: FlexFloat,
    #[serde(default)]
    close: FlexFloat,
    #[serde(default)]
    adjusted_close: FlexFloat,
    #[serde(default)]
    volume: FlexFloat,
}

pub struct EodhdClient {
    client: MarketDataClient,
}

impl EodhdClient {
    pub fn new(client: MarketDataClient) -> Self {
        Self { client }
    }

    /// Fetches the day's bars for `exchange_code` (e.g. `"AU"`) and
    /// reconciles them against `requested_tickers` (each carrying the
    /// `.{exchange_code}` suffix, e.g. `"BHP.AU"`). Duplicate entries in
    /// `requested_tickers` collapse to a single query-parameter entry —
    /// requesting once per duplicate would also be correct, just wasteful.
    pub async fn bulk_fetch(&self, exchange_code: &str, requested_tickers: &[String]) -> Result<HashMap<String, MarketBar>, CashFlowError> {
        let suffix = format!(".{exchange_code}");
        let mut dedup_bases: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for ticker in requested_tickers {
            let base = strip_suffix(ticker, &suffix);
            if seen.insert(base.clone()) {
                dedup_bases.push(base);
            }
        }
        let symbols = dedup_bases.join(",");

        let mut query: Vec<(&str, &str)> = vec![("fmt", "json")];
        if let Some(key) = self.client.api_key() {
            query.push(("api_token", key));
        }
        query.push(("symbols", &symbols));

        let rows: Vec<EodhdRow> = self
            .client
            .get_json(&format!("/eod-bulk-last-day/{exchange_code}"), &query)
            .await?;

        let mut result = HashMap::new();
        for requested in requested_tickers {
            let base = strip_suffix(requested, &suffix);
            let matched = rows.iter().find(|row| row_matches(row, requested, &base, exchange_code));
            if let Some(row) = matched {
                result.insert(requested.clone(), project(row));
            }
        }

        Ok(result)
    }
}

fn row_matches(row: &EodhdRow, requested: &str, base: &str, exchange_code: &str) -> bool {
    if row.code == requested {
        return true;
    }
    if row.code == base {
        return match &row.exchange_short_name {
            Some(row_exchange) => row_exchange == exchange_code,
            None => true,
        };
    }
    false
}

fn project(row: &EodhdRow) -> MarketBar {
    MarketBar {
        code: row.code.clone(),
        date: row.date,
        open: row.open.0,
        high: row.high.0,
        low: row.low.0,
        close: row.close.0,
        adjusted_close: row.adjusted_close.0,
        volume: row.volume.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, exchange: Option<&str>) -> EodhdRow {
        EodhdRow {
            code: code.to_string(),
            exchange_short_name: exchange.map(String::from),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            open: FlexFloat(1.0),
            high: FlexFloat(1.0),
            low: FlexFloat(1.0),
            close: FlexFloat(1.0),
            adjusted_close: FlexFloat(1.0),
            volume: FlexFloat(1.0),
        }
    }

    #[test]
    fn scenario_six_identity_reconciliation() {
        let rows = vec![row("BHP", Some("AU")), row("ACDC", None), row("BHP", Some("US"))];
        let requested = vec!["BHP.AU".to_string(), "ACDC.AU".to_string()];

        let mut found = HashMap::new();
        for ticker in &requested {
            let base = strip_suffix(ticker, ".AU");
            if let Some(r) = rows.iter().find(|row| row_matches(row, ticker, &base, "AU")) {
                found.insert(ticker.clone(), project(r));
            }
        }

        assert!(found.contains_key("BHP.AU"));
        assert!(found.contains_key("ACDC.AU"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn conflicting_exchange_does_not_populate_requested_key() {
        let rows = vec![row("BHP", Some("US"))];
        let base = strip_suffix("BHP.AU", ".AU");
        assert!(!rows.iter().any(|r| row_matches(r, "BHP.AU", &base, "AU")));
    }

    #[test]
    fn exact_code_match_wins_even_with_suffix_present() {
        let rows = vec![row("BHP.AU", None)];
        let base = strip_suffix("BHP.AU", ".AU");
        assert!(rows.iter().any(|r| row_matches(r, "BHP.AU", &base, "AU")));
    }
}

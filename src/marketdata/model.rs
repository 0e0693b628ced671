//! Uniform market-data model: `MarketBar` and `RealTimeQuote`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One day's OHLCV bar, normalized from whichever provider supplied it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketBar {
    pub code: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: f64,
}

/// A single real-time (or latest-available) quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealTimeQuote {
    pub code: String,
    pub timestamp: DateTime<Utc>,
    pub last: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub change: f64,
    pub change_percent: f64,
    pub source: String,
}

//! Capital-performance result type.
//!
//! A pure, derived view — never persisted, always recomputed from the
//! ledger and the current portfolio snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CapitalPerformance {
    pub gross_deposited: f64,
    pub gross_withdrawn: f64,
    pub net_capital_deployed: f64,
    pub equity_value: f64,
    pub simple_return_percent: f64,
    pub annualized_return_percent: f64,
    pub first_transaction_date: Option<DateTime<Utc>>,
    pub transaction_count: usize,
}

impl CapitalPerformance {
    pub fn zero() -> Self {
        Self {
            gross_deposited: 0.0,
            gross_withdrawn: 0.0,
            net_capital_deployed: 0.0,
            equity_value: 0.0,
            simple_return_percent: 0.0,
            annualized_return_percent: 0.0,
            first_transaction_date: None,
            transaction_count: 0,
        }
    }
}

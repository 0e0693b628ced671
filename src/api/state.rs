//! Shared application state, wired once in [`super::serve`] and cloned
//! into every handler via axum's `State` extractor.

use std::sync::Arc;

use crate::cashflow::CashFlowService;
use crate::portfolio::PortfolioSource;

#[derive(Clone)]
pub struct AppState {
    pub cashflow: Arc<CashFlowService>,
    pub portfolio: Arc<dyn PortfolioSource>,
}

impl AppState {
    pub fn new(cashflow: Arc<CashFlowService>, portfolio: Arc<dyn PortfolioSource>) -> Self {
        Self { cashflow, portfolio }
    }
}

//! Portfolio review.
//!
//! The AI/reporting layer that would turn this into prose is an external
//! collaborator, out of scope here. This handler applies the freshness
//! contract (same as [`super::portfolio::get_portfolio`]) and returns the
//! fetched snapshot plus the derived performance — the shape an actual
//! review/report generator would consume — without implementing any
//! report rendering itself.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::context::RequireNavexaContext;
use crate::error::CashFlowError;
use crate::performance::{self, CapitalPerformance};
use crate::portfolio::PortfolioSnapshot;

use crate::api::state::AppState;

#[derive(Serialize)]
pub struct PortfolioReview {
    pub snapshot: PortfolioSnapshot,
    pub performance: CapitalPerformance,
}

pub async fn review_portfolio(
    RequireNavexaContext(ctx): RequireNavexaContext,
    State(state): State<AppState>,
    Path(portfolio): Path<String>,
) -> Result<Json<PortfolioReview>, CashFlowError> {
    let snapshot = state.portfolio.fetch(&ctx, &portfolio).await?;
    let ledger = state.cashflow.get_ledger(&ctx.user_id, &portfolio).await?;
    let performance = performance::calculate(&ledger, &snapshot);
    Ok(Json(PortfolioReview { snapshot, performance }))
}

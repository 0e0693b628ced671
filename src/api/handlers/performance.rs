//! Capital-performance endpoint.
//!
//! Navexa-gated: fetches the (auto-refreshed) holdings snapshot, loads
//! the ledger, and hands both to the pure calculator.

use axum::Json;
use axum::extract::{Path, State};

use crate::context::RequireNavexaContext;
use crate::error::CashFlowError;
use crate::performance::{self, CapitalPerformance};

use crate::api::state::AppState;

pub async fn get_performance(
    RequireNavexaContext(ctx): RequireNavexaContext,
    State(state): State<AppState>,
    Path(portfolio): Path<String>,
) -> Result<Json<CapitalPerformance>, CashFlowError> {
    tracing::debug!(user_id = %ctx.user_id, %portfolio, correlation_id = ctx.correlation_id.as_deref().unwrap_or("-"), "computing capital performance");
    let snapshot = state.portfolio.fetch(&ctx, &portfolio).await?;
    let ledger = state.cashflow.get_ledger(&ctx.user_id, &portfolio).await?;
    Ok(Json(performance::calculate(&ledger, &snapshot)))
}

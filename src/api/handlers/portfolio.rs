//! Portfolio retrieval. A thin passthrough to the boundary contract —
//! the freshness/auto-refresh policy lives entirely on
//! [`crate::portfolio::PortfolioSource::fetch`], not here.

use axum::Json;
use axum::extract::{Path, State};

use crate::context::RequireNavexaContext;
use crate::error::CashFlowError;
use crate::portfolio::PortfolioSnapshot;

use crate::api::state::AppState;

pub async fn get_portfolio(
    RequireNavexaContext(ctx): RequireNavexaContext,
    State(state): State<AppState>,
    Path(portfolio): Path<String>,
) -> Result<Json<PortfolioSnapshot>, CashFlowError> {
    let snapshot = state.portfolio.fetch(&ctx, &portfolio).await?;
    Ok(Json(snapshot))
}

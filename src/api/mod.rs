pub mod handlers;
pub mod state;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

use crate::cashflow::CashFlowService;
use crate::config::AppConfig;
use crate::context::{NAVEXA_KEY_HEADER, USER_ID_HEADER};
use crate::portfolio::{NavexaSync, SqlitePortfolioSource};
use crate::store::SqliteUserDataStore;

use state::AppState;

/// The portfolio-holdings synchronization pipeline is an external
/// collaborator — this crate describes only the interface the cash-flow
/// engine consumes from it ([`crate::portfolio::PortfolioSource`]). No
/// real Navexa HTTP client is implemented here, so this stub always
/// fails; `fetch` then falls back to whatever snapshot is already
/// cached, per the documented freshness policy.
struct UnconfiguredNavexaSync;

#[async_trait::async_trait]
impl NavexaSync for UnconfiguredNavexaSync {
    async fn resync(
        &self,
        _ctx: &crate::context::UserContext,
        portfolio: &str,
    ) -> Result<crate::portfolio::PortfolioSnapshot, crate::error::CashFlowError> {
        Err(crate::error::CashFlowError::upstream(
            "navexa",
            format!("no Navexa client configured for portfolio '{portfolio}'"),
        ))
    }
}

pub async fn serve(host: &str, port: u16, data_dir: &Path, _config: &AppConfig) -> Result<()> {
    let data_dir = if data_dir.starts_with("~") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        std::path::PathBuf::from(home).join(data_dir.strip_prefix("~").unwrap())
    } else {
        data_dir.to_path_buf()
    };

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let db_path = data_dir.join("vire-cashflow.db");
    let store: Arc<dyn crate::store::UserDataStore> = Arc::new(
        SqliteUserDataStore::open(&db_path).with_context(|| format!("opening database at {}", db_path.display()))?,
    );

    let cashflow = Arc::new(CashFlowService::new(store.clone()));
    let portfolio = Arc::new(SqlitePortfolioSource::new(store, Arc::new(UnconfiguredNavexaSync)));

    let state = AppState::new(cashflow, portfolio);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    tracing::debug!(user_id_header = USER_ID_HEADER, navexa_key_header = NAVEXA_KEY_HEADER, "cors allows both tenancy headers");

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/portfolios/{name}", get(handlers::portfolio::get_portfolio))
        .route("/api/portfolios/{name}/review", post(handlers::review::review_portfolio))
        .route("/api/portfolios/{name}/performance", get(handlers::performance::get_performance))
        .route("/api/portfolios/{name}/cashflow", get(handlers::cashflow::get_ledger))
        .route("/api/portfolios/{name}/cashflow/clear", post(handlers::cashflow::clear_ledger))
        .route("/api/portfolios/{name}/cashflow/transfer", post(handlers::cashflow::add_transfer))
        .route(
            "/api/portfolios/{name}/cashflow/transactions",
            post(handlers::cashflow::add_transaction).put(handlers::cashflow::set_transactions),
        )
        .route(
            "/api/portfolios/{name}/cashflow/transactions/{id}",
            put(handlers::cashflow::update_transaction).delete(handlers::cashflow::remove_transaction),
        )
        .route(
            "/api/portfolios/{name}/cashflow/accounts/{account_name}",
            put(handlers::cashflow::update_account),
        )
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    tracing::info!(%host, %port, "listening");
    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}

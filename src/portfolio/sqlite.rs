//! Production [`PortfolioSource`]: snapshot persistence over the generic
//! store, plus a pluggable Navexa sync callback.
//!
//! The holdings-synchronization pipeline itself is an external
//! collaborator — this module owns the snapshot cache and the freshness
//! contract; the actual Navexa HTTP exchange is behind the [`NavexaSync`]
//! trait so a real implementation can be dropped in without touching the
//! calculator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::UserContext;
use crate::error::CashFlowError;
use crate::store::UserDataStore;

use super::{PortfolioSnapshot, PortfolioSource};

const SUBJECT: &str = "holdings";

/// Performs the actual upstream re-sync. Implementations own the
/// Navexa HTTP exchange; this crate only defines the contract it must
/// satisfy.
#[async_trait]
pub trait NavexaSync: Send + Sync {
    async fn resync(&self, ctx: &UserContext, portfolio: &str) -> Result<PortfolioSnapshot, CashFlowError>;
}

pub struct SqlitePortfolioSource {
    store: Arc<dyn UserDataStore>,
    navexa: Arc<dyn NavexaSync>,
}

impl SqlitePortfolioSource {
    pub fn new(store: Arc<dyn UserDataStore>, navexa: Arc<dyn NavexaSync>) -> Self {
        Self { store, navexa }
    }
}

#[async_trait]
impl PortfolioSource for SqlitePortfolioSource {
    async fn cached_snapshot(&self, user_id: &str, portfolio: &str) -> Result<Option<PortfolioSnapshot>, CashFlowError> {
        let raw = self
            .store
            .get(user_id, SUBJECT, portfolio)
            .await
            .map_err(|e| CashFlowError::storage(portfolio, e.to_string()))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| CashFlowError::storage(portfolio, format!("decoding snapshot: {e}"))),
            None => Ok(None),
        }
    }

    async fn resync(&self, ctx: &UserContext, portfolio: &str) -> Result<PortfolioSnapshot, CashFlowError> {
        let snapshot = self.navexa.resync(ctx, portfolio).await?;

        let json = serde_json::to_string(&snapshot)
            .map_err(|e| CashFlowError::storage(portfolio, format!("encoding snapshot: {e}")))?;
        self.store
            .put(&ctx.user_id, SUBJECT, portfolio, &json)
            .await
            .map_err(|e| CashFlowError::storage(portfolio, e.to_string()))?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteUserDataStore;
    use chrono::Utc;

    struct AlwaysFresh;

    #[async_trait]
    impl NavexaSync for AlwaysFresh {
        async fn resync(&self, _ctx: &UserContext, _portfolio: &str) -> Result<PortfolioSnapshot, CashFlowError> {
            Ok(PortfolioSnapshot {
                holdings: vec![],
                equity_value: 42.0,
                last_synced_at: Utc::now(),
            })
        }
    }

    fn ctx() -> UserContext {
        UserContext {
            user_id: "u1".into(),
            navexa_key: "k".into(),
            correlation_id: None,
        }
    }

    #[tokio::test]
    async fn resync_persists_then_cached_snapshot_reads_it_back() {
        let store = Arc::new(SqliteUserDataStore::open_in_memory().unwrap());
        let source = SqlitePortfolioSource::new(store, Arc::new(AlwaysFresh));

        assert!(source.cached_snapshot("u1", "SMSF").await.unwrap().is_none());

        let fetched = source.fetch(&ctx(), "SMSF").await.unwrap();
        assert_eq!(fetched.equity_value, 42.0);

        let cached = source.cached_snapshot("u1", "SMSF").await.unwrap().unwrap();
        assert_eq!(cached.equity_value, 42.0);
    }
}

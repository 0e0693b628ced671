//! Portfolio service boundary contract.
//!
//! The calculator consumes only this interface. Freshness (auto-refresh on
//! a stale snapshot) is implemented once, as a default trait method, so
//! every caller — the calculator, review, report generation — gets it for
//! free rather than relying on an HTTP handler wrapper to apply it.

pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::context::UserContext;
use crate::error::CashFlowError;

pub use sqlite::{NavexaSync, SqlitePortfolioSource};

/// Freshness TTL for a holdings snapshot.
pub const SNAPSHOT_TTL: Duration = Duration::minutes(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    Buy,
    Sell,
    OpeningBalance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub kind: TradeKind,
    /// Accepts `YYYY-MM-DD` and `YYYY-MM-DDTHH:MM:SS` on ingestion;
    /// stored here already parsed.
    pub date: DateTime<Utc>,
    pub units: f64,
    pub price: f64,
    pub fees: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub code: String,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub holdings: Vec<Holding>,
    /// Holdings-only equity value, excluding cash / non-transactional balances.
    pub equity_value: f64,
    pub last_synced_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    pub fn all_trades(&self) -> impl Iterator<Item = &Trade> {
        self.holdings.iter().flat_map(|h| h.trades.iter())
    }
}

/// Parses upstream trade dates, accepting both `YYYY-MM-DD` and
/// `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_trade_date(raw: &str) -> Result<DateTime<Utc>, CashFlowError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    Err(CashFlowError::validation("trade.date", format!("unparseable date '{raw}'")))
}

#[async_trait]
pub trait PortfolioSource: Send + Sync {
    /// Reads whatever snapshot is currently persisted, if any.
    async fn cached_snapshot(&self, user_id: &str, portfolio: &str) -> Result<Option<PortfolioSnapshot>, CashFlowError>;

    /// Forces a re-sync against the upstream Navexa client attached to
    /// `ctx`, persists the result, and returns it.
    async fn resync(&self, ctx: &UserContext, portfolio: &str) -> Result<PortfolioSnapshot, CashFlowError>;

    /// Fetches the portfolio, auto-refreshing if the cached snapshot's
    /// `last_synced_at` is older than [`SNAPSHOT_TTL`]. If the re-sync
    /// fails, the stale cached snapshot is returned instead — this check
    /// lives here, on the service method, so review, report generation,
    /// and the calculator all get it without having to remember to ask
    /// for it.
    async fn fetch(&self, ctx: &UserContext, portfolio: &str) -> Result<PortfolioSnapshot, CashFlowError> {
        let cached = self.cached_snapshot(&ctx.user_id, portfolio).await?;
        let is_stale = cached
            .as_ref()
            .map(|s| Utc::now() - s.last_synced_at > SNAPSHOT_TTL)
            .unwrap_or(true);

        if !is_stale {
            return Ok(cached.expect("checked stale against Some above"));
        }

        match self.resync(ctx, portfolio).await {
            Ok(fresh) => Ok(fresh),
            Err(err) => cached.ok_or(err),
        }
    }
}

/// Test double: a fixed snapshot, never stale, no network. A deterministic
/// in-process stand-in rather than a mock of the network boundary.
pub struct StaticPortfolioSource {
    snapshot: PortfolioSnapshot,
}

impl StaticPortfolioSource {
    pub fn new(snapshot: PortfolioSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl PortfolioSource for StaticPortfolioSource {
    async fn cached_snapshot(&self, _user_id: &str, _portfolio: &str) -> Result<Option<PortfolioSnapshot>, CashFlowError> {
        Ok(Some(self.snapshot.clone()))
    }

    async fn resync(&self, _ctx: &UserContext, _portfolio: &str) -> Result<PortfolioSnapshot, CashFlowError> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaleThenFail {
        stale: PortfolioSnapshot,
    }

    #[async_trait]
    impl PortfolioSource for StaleThenFail {
        async fn cached_snapshot(&self, _user_id: &str, _portfolio: &str) -> Result<Option<PortfolioSnapshot>, CashFlowError> {
            Ok(Some(self.stale.clone()))
        }
        async fn resync(&self, _ctx: &UserContext, _portfolio: &str) -> Result<PortfolioSnapshot, CashFlowError> {
            Err(CashFlowError::upstream("navexa", "timed out"))
        }
    }

    #[test]
    fn parses_both_date_formats() {
        assert!(parse_trade_date("2025-01-01").is_ok());
        assert!(parse_trade_date("2025-01-01T10:30:00").is_ok());
        assert!(parse_trade_date("not-a-date").is_err());
    }

    #[tokio::test]
    async fn falls_back_to_stale_snapshot_on_resync_failure() {
        let source = StaleThenFail {
            stale: PortfolioSnapshot {
                holdings: vec![],
                equity_value: 100.0,
                last_synced_at: Utc::now() - Duration::hours(2),
            },
        };
        let ctx = UserContext {
            user_id: "u1".into(),
            navexa_key: "k".into(),
            correlation_id: None,
        };
        let result = source.fetch(&ctx, "SMSF").await.unwrap();
        assert_eq!(result.equity_value, 100.0);
    }
}

//! End-to-end scenarios against the cash-flow/portfolio/performance stack,
//! wired together the way the HTTP layer wires them but without a server
//! process or any network call.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use vire_cashflow::cashflow::{CashFlowService, NewTransactionInput, NewTransferInput};
use vire_cashflow::context::UserContext;
use vire_cashflow::error::CashFlowError;
use vire_cashflow::performance;
use vire_cashflow::portfolio::{
    Holding, NavexaSync, PortfolioSnapshot, PortfolioSource, SqlitePortfolioSource, Trade, TradeKind,
};
use vire_cashflow::store::{SqliteUserDataStore, UserDataStore};

fn tx_input(account: &str, category: &str, amount: f64, date: DateTime<Utc>) -> NewTransactionInput {
    NewTransactionInput {
        account: account.to_string(),
        category: category.to_string(),
        date,
        amount,
        description: "test".to_string(),
        notes: String::new(),
    }
}

fn ctx(user_id: &str) -> UserContext {
    UserContext {
        user_id: user_id.to_string(),
        navexa_key: "dummy-key".to_string(),
        correlation_id: None,
    }
}

struct FixedNavexaSync {
    snapshot: PortfolioSnapshot,
}

#[async_trait]
impl NavexaSync for FixedNavexaSync {
    async fn resync(&self, _ctx: &UserContext, _portfolio: &str) -> Result<PortfolioSnapshot, CashFlowError> {
        Ok(self.snapshot.clone())
    }
}

#[tokio::test]
async fn paired_transfer_keeps_the_ledger_in_balance() {
    let store = Arc::new(SqliteUserDataStore::open_in_memory().unwrap());
    let cashflow = CashFlowService::new(store);

    let d1 = Utc::now() - Duration::days(60);
    let d2 = Utc::now() - Duration::days(30);

    cashflow
        .add_transaction("u1", "SMSF", tx_input("Trading", "contribution", 100_000.0, d1))
        .await
        .unwrap();

    let ledger = cashflow
        .add_transfer(
            "u1",
            "SMSF",
            NewTransferInput {
                from_account: "Trading".into(),
                to_account: "Accumulate".into(),
                amount: 20_000.0,
                date: d2,
                description: "rebalance".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(ledger.total_balance(), 100_000.0);
    assert_eq!(ledger.balance("Trading"), 80_000.0);
    assert_eq!(ledger.balance("Accumulate"), 20_000.0);

    let ledger = cashflow.remove_transaction("u1", "SMSF", &ledger.transactions[1].id).await.unwrap();
    assert_eq!(ledger.transactions.len(), 1);
    assert_eq!(ledger.total_balance(), 100_000.0);
}

#[tokio::test]
async fn performance_combines_the_ledger_with_a_live_portfolio_snapshot() {
    let store: Arc<dyn vire_cashflow::store::UserDataStore> = Arc::new(SqliteUserDataStore::open_in_memory().unwrap());
    let cashflow = CashFlowService::new(store.clone());

    let d1 = Utc::now() - Duration::days(90);
    cashflow
        .add_transaction("u1", "SMSF", tx_input("Trading", "contribution", 100_000.0, d1))
        .await
        .unwrap();
    let ledger = cashflow.get_ledger("u1", "SMSF").await.unwrap();

    let snapshot = PortfolioSnapshot {
        holdings: vec![],
        equity_value: 120_000.0,
        last_synced_at: Utc::now(),
    };
    let portfolio = SqlitePortfolioSource::new(store, Arc::new(FixedNavexaSync { snapshot: snapshot.clone() }));

    let fetched = portfolio.fetch(&ctx("u1"), "SMSF").await.unwrap();
    let result = performance::calculate(&ledger, &fetched);

    assert_eq!(result.gross_deposited, 100_000.0);
    assert_eq!(result.net_capital_deployed, 100_000.0);
    assert!((result.simple_return_percent - 20.0).abs() < 1e-9);
}

#[tokio::test]
async fn stale_snapshot_auto_refreshes_through_the_service_boundary() {
    let store: Arc<dyn vire_cashflow::store::UserDataStore> = Arc::new(SqliteUserDataStore::open_in_memory().unwrap());

    let stale = PortfolioSnapshot {
        holdings: vec![],
        equity_value: 1.0,
        last_synced_at: Utc::now() - Duration::hours(3),
    };
    store
        .put("u1", "holdings", "SMSF", &serde_json::to_string(&stale).unwrap())
        .await
        .unwrap();

    let fresh = PortfolioSnapshot {
        holdings: vec![Holding {
            code: "BHP.AU".into(),
            trades: vec![Trade {
                kind: TradeKind::Buy,
                date: Utc::now() - Duration::days(1),
                units: 10.0,
                price: 40.0,
                fees: 0.0,
            }],
        }],
        equity_value: 500.0,
        last_synced_at: Utc::now(),
    };
    let portfolio = SqlitePortfolioSource::new(store, Arc::new(FixedNavexaSync { snapshot: fresh }));

    let fetched = portfolio.fetch(&ctx("u1"), "SMSF").await.unwrap();
    assert_eq!(fetched.equity_value, 500.0);
}

#[tokio::test]
async fn bulk_set_rejects_the_whole_batch_on_one_bad_candidate() {
    let store = Arc::new(SqliteUserDataStore::open_in_memory().unwrap());
    let cashflow = CashFlowService::new(store);
    let d = Utc::now() - Duration::days(1);

    cashflow
        .add_transaction("u1", "SMSF", tx_input("Trading", "contribution", 5_000.0, d))
        .await
        .unwrap();

    let result = cashflow
        .set_transactions(
            "u1",
            "SMSF",
            vec![
                tx_input("Trading", "contribution", 1_000.0, d),
                tx_input("Trading", "not-a-real-category", 1.0, d),
            ],
            None,
        )
        .await;
    assert!(matches!(result, Err(CashFlowError::Validation { .. })));

    let ledger = cashflow.get_ledger("u1", "SMSF").await.unwrap();
    assert_eq!(ledger.transactions.len(), 1);
    assert_eq!(ledger.transactions[0].amount, 5_000.0);
}

#[test]
fn configuration_gate_rejects_a_blank_navexa_key() {
    let ctx = UserContext {
        user_id: "u1".into(),
        navexa_key: "   ".into(),
        correlation_id: None,
    };
    assert!(matches!(ctx.require_navexa(), Err(CashFlowError::Configuration)));
}

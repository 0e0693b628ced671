//! Capital-performance calculator.
//!
//! Phase 1 derives category-filtered totals straight from the ledger;
//! phase 2 synthesizes trade cash-flows from the portfolio snapshot and
//! solves XIRR. The two phases share nothing and are kept separate so the
//! empty-ledger fallback can substitute a synthetic series for phase 1
//! without touching phase 2 at all.

pub mod model;
pub mod xirr;

use chrono::Utc;

use crate::cashflow::{CashFlowLedger, TransactionCategory};
use crate::portfolio::{PortfolioSnapshot, Trade, TradeKind};

pub use model::CapitalPerformance;

/// Signed cash flow a single trade contributes to the XIRR series:
/// buy/opening-balance are outflows, sell is an inflow net of fees
/// (floored at zero).
fn trade_flow(trade: &Trade) -> f64 {
    match trade.kind {
        TradeKind::Buy | TradeKind::OpeningBalance => -(trade.units * trade.price + trade.fees),
        TradeKind::Sell => (trade.units * trade.price - trade.fees).max(0.0),
    }
}

struct Totals {
    deposited: f64,
    withdrawn: f64,
    first_transaction_date: Option<chrono::DateTime<Utc>>,
    transaction_count: usize,
}

fn totals_from_ledger(ledger: &CashFlowLedger) -> Totals {
    let mut deposited = 0.0;
    let mut withdrawn = 0.0;
    let mut first_transaction_date = None;

    for txn in &ledger.transactions {
        first_transaction_date = Some(match first_transaction_date {
            Some(existing) if existing <= txn.date => existing,
            _ => txn.date,
        });

        if txn.category != TransactionCategory::Contribution {
            continue;
        }
        if txn.amount > 0.0 {
            deposited += txn.amount;
        } else if txn.amount < 0.0 {
            withdrawn += txn.amount.abs();
        }
    }

    Totals {
        deposited,
        withdrawn,
        first_transaction_date,
        transaction_count: ledger.transactions.len(),
    }
}

/// Synthesizes capital totals from trade history when the ledger carries
/// no transactions at all: buys count as deposits, sells as withdrawals,
/// under the same sign convention as [`trade_flow`].
fn totals_from_trades(snapshot: &PortfolioSnapshot) -> Totals {
    let mut deposited = 0.0;
    let mut withdrawn = 0.0;
    let mut first_transaction_date = None;

    for trade in snapshot.all_trades() {
        let flow = trade_flow(trade);
        if flow < 0.0 {
            deposited += -flow;
        } else if flow > 0.0 {
            withdrawn += flow;
        }
        first_transaction_date = Some(match first_transaction_date {
            Some(existing) if existing <= trade.date => existing,
            _ => trade.date,
        });
    }

    Totals {
        deposited,
        withdrawn,
        first_transaction_date,
        transaction_count: snapshot.all_trades().count(),
    }
}

/// Computes capital performance from a loaded ledger and the portfolio's
/// current holdings-only equity value. Pure function — no I/O, no
/// persistence, safe to call repeatedly with the same inputs.
pub fn calculate(ledger: &CashFlowLedger, snapshot: &PortfolioSnapshot) -> CapitalPerformance {
    let has_trades = snapshot.all_trades().next().is_some();

    let totals = if ledger.transactions.is_empty() {
        if !has_trades {
            return CapitalPerformance::zero();
        }
        totals_from_trades(snapshot)
    } else {
        totals_from_ledger(ledger)
    };

    let net_capital_deployed = totals.deposited - totals.withdrawn;
    let simple_return_percent = if net_capital_deployed > 0.0 {
        (snapshot.equity_value - net_capital_deployed) / net_capital_deployed * 100.0
    } else {
        0.0
    };

    let annualized_return_percent = if has_trades {
        let mut flows: Vec<_> = snapshot.all_trades().map(|t| (t.date, trade_flow(t))).collect();
        flows.push((Utc::now(), snapshot.equity_value));
        xirr::xirr(&flows) * 100.0
    } else {
        0.0
    };

    CapitalPerformance {
        gross_deposited: totals.deposited,
        gross_withdrawn: totals.withdrawn,
        net_capital_deployed,
        equity_value: snapshot.equity_value,
        simple_return_percent,
        annualized_return_percent,
        first_transaction_date: totals.first_transaction_date,
        transaction_count: totals.transaction_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflow::{CashAccount, CashTransaction};
    use chrono::Duration;

    fn txn(category: TransactionCategory, amount: f64, date: chrono::DateTime<Utc>) -> CashTransaction {
        CashTransaction {
            id: "ct_00000000".into(),
            account: "Trading".into(),
            category,
            date,
            amount,
            description: "test".into(),
            notes: String::new(),
            linked_id: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            direction: None,
        }
    }

    #[test]
    fn scenario_two_performance_with_equity_snapshot() {
        let mut ledger = CashFlowLedger::new_default("SMSF");
        ledger.accounts.push(CashAccount::auto_created("Accumulate"));
        let d0 = Utc::now() - Duration::days(60);
        let d1 = Utc::now() - Duration::days(30);
        ledger.transactions.push(txn(TransactionCategory::Contribution, 100000.0, d0));
        ledger.transactions.push(txn(TransactionCategory::Transfer, -20000.0, d1));
        ledger.transactions.push(txn(TransactionCategory::Transfer, 20000.0, d1));

        let snapshot = PortfolioSnapshot {
            holdings: vec![],
            equity_value: 120000.0,
            last_synced_at: Utc::now(),
        };

        let result = calculate(&ledger, &snapshot);
        assert_eq!(result.gross_deposited, 100000.0);
        assert_eq!(result.gross_withdrawn, 0.0);
        assert_eq!(result.net_capital_deployed, 100000.0);
        assert_eq!(result.equity_value, 120000.0);
        assert!((result.simple_return_percent - 20.0).abs() < 1e-9);
        assert_eq!(result.transaction_count, 3);
    }

    #[test]
    fn first_transaction_date_tracks_all_transactions_not_just_contributions() {
        let mut ledger = CashFlowLedger::new_default("SMSF");
        let earliest = Utc::now() - Duration::days(90);
        let later = Utc::now() - Duration::days(30);
        ledger.transactions.push(txn(TransactionCategory::Fee, -5.0, earliest));
        ledger.transactions.push(txn(TransactionCategory::Dividend, 50.0, later));

        let snapshot = PortfolioSnapshot {
            holdings: vec![],
            equity_value: 100.0,
            last_synced_at: Utc::now(),
        };
        let result = calculate(&ledger, &snapshot);

        assert_eq!(result.transaction_count, 2);
        assert_eq!(result.first_transaction_date, Some(earliest));
    }

    #[test]
    fn zero_net_deployed_forces_zero_simple_return() {
        let ledger = CashFlowLedger::new_default("SMSF");
        let snapshot = PortfolioSnapshot {
            holdings: vec![],
            equity_value: 500.0,
            last_synced_at: Utc::now(),
        };
        let result = calculate(&ledger, &snapshot);
        assert_eq!(result.simple_return_percent, 0.0);
        assert_eq!(result.annualized_return_percent, 0.0);
    }

    #[test]
    fn scenario_four_xirr_on_single_year_gain() {
        use crate::portfolio::Holding;

        let ledger = CashFlowLedger::new_default("SMSF");
        let buy_date = Utc::now() - Duration::days(365);
        let snapshot = PortfolioSnapshot {
            holdings: vec![Holding {
                code: "BHP.AU".into(),
                trades: vec![Trade {
                    kind: TradeKind::Buy,
                    date: buy_date,
                    units: 100.0,
                    price: 40.0,
                    fees: 10.0,
                }],
            }],
            equity_value: 4812.0,
            last_synced_at: Utc::now(),
        };

        let result = calculate(&ledger, &snapshot);
        assert!(
            (result.annualized_return_percent - 20.0).abs() < 0.5,
            "expected ~20%, got {}",
            result.annualized_return_percent
        );
    }

    #[test]
    fn empty_ledger_with_no_trades_is_zero() {
        let ledger = CashFlowLedger::new_default("SMSF");
        let snapshot = PortfolioSnapshot {
            holdings: vec![],
            equity_value: 0.0,
            last_synced_at: Utc::now(),
        };
        let result = calculate(&ledger, &snapshot);
        assert_eq!(result.gross_deposited, 0.0);
        assert_eq!(result.annualized_return_percent, 0.0);
    }
}

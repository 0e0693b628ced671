//! Integration-level coverage of the XIRR solver driven through the
//! capital-performance calculator, rather than calling `xirr::xirr`
//! directly — exercising the same path a request handler would take.

use chrono::{Duration, Utc};

use vire_cashflow::cashflow::CashFlowLedger;
use vire_cashflow::performance;
use vire_cashflow::portfolio::{Holding, PortfolioSnapshot, Trade, TradeKind};

#[test]
fn single_buy_followed_by_a_twenty_percent_gain_annualizes_to_about_twenty_percent() {
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
        equity_value: 4_812.0,
        last_synced_at: Utc::now(),
    };

    let result = performance::calculate(&ledger, &snapshot);
    assert!(
        (result.annualized_return_percent - 20.0).abs() < 0.5,
        "expected roughly 20%, got {}",
        result.annualized_return_percent
    );
}

#[test]
fn a_sell_then_a_rebuy_still_converges_to_a_finite_rate() {
    let ledger = CashFlowLedger::new_default("SMSF");

    let snapshot = PortfolioSnapshot {
        holdings: vec![Holding {
            code: "CBA.AU".into(),
            trades: vec![
                Trade {
                    kind: TradeKind::Buy,
                    date: Utc::now() - Duration::days(400),
                    units: 50.0,
                    price: 80.0,
                    fees: 15.0,
                },
                Trade {
                    kind: TradeKind::Sell,
                    date: Utc::now() - Duration::days(200),
                    units: 20.0,
                    price: 95.0,
                    fees: 10.0,
                },
                Trade {
                    kind: TradeKind::Buy,
                    date: Utc::now() - Duration::days(100),
                    units: 10.0,
                    price: 90.0,
                    fees: 5.0,
                },
            ],
        }],
        equity_value: 3_900.0,
        last_synced_at: Utc::now(),
    };

    let result = performance::calculate(&ledger, &snapshot);
    assert!(result.annualized_return_percent.is_finite());
}

#[test]
fn opening_balance_trades_count_as_outflows_like_a_buy() {
    let ledger = CashFlowLedger::new_default("SMSF");

    let snapshot = PortfolioSnapshot {
        holdings: vec![Holding {
            code: "VAS.AU".into(),
            trades: vec![Trade {
                kind: TradeKind::OpeningBalance,
                date: Utc::now() - Duration::days(365),
                units: 200.0,
                price: 85.0,
                fees: 0.0,
            }],
        }],
        equity_value: 18_700.0,
        last_synced_at: Utc::now(),
    };

    let result = performance::calculate(&ledger, &snapshot);
    assert!(result.annualized_return_percent > 0.0);
}

#[test]
fn an_empty_portfolio_with_no_trades_reports_zero_rather_than_diverging() {
    let ledger = CashFlowLedger::new_default("SMSF");
    let snapshot = PortfolioSnapshot {
        holdings: vec![],
        equity_value: 0.0,
        last_synced_at: Utc::now(),
    };

    let result = performance::calculate(&ledger, &snapshot);
    assert_eq!(result.annualized_return_percent, 0.0);
}

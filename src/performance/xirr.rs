//! Newton–Raphson XIRR with bisection fallback.
//!
//! The iteration shape — NPV-and-derivative pair, clamped rate, tolerance
//! check — follows the portfolio performance module this crate grew out
//! of (see DESIGN.md), extended with 365.25-day years, an initial-guess
//! heuristic from the simple return ratio, and a bisection fallback when
//! Newton diverges.

use chrono::{DateTime, Utc};

const DAYS_PER_YEAR: f64 = 365.25;
const NEWTON_MAX_ITERATIONS: usize = 100;
const NEWTON_TOLERANCE: f64 = 1e-7;
const BISECTION_MAX_ITERATIONS: usize = 200;
const BISECTION_LO: f64 = -0.99;
const BISECTION_HI: f64 = 10.0;
const RATE_FLOOR: f64 = -0.999;
const RATE_CEIL: f64 = 100.0;

/// Solves for the annualized rate `r` such that `sum(cf / (1+r)^years) = 0`.
/// Returns 0.0 when the series has no trades, lacks both a negative and a
/// positive flow, or when neither Newton–Raphson nor bisection can produce
/// a finite answer. The caller multiplies the result by 100 for a percent.
pub fn xirr(flows: &[(DateTime<Utc>, f64)]) -> f64 {
    if flows.is_empty() {
        return 0.0;
    }

    let has_negative = flows.iter().any(|(_, cf)| *cf < 0.0);
    let has_positive = flows.iter().any(|(_, cf)| *cf > 0.0);
    if !has_negative || !has_positive {
        return 0.0;
    }

    let first_date = flows.iter().map(|(d, _)| *d).min().expect("non-empty checked above");
    let year_flows: Vec<(f64, f64)> = flows
        .iter()
        .map(|(date, cf)| (year_fraction(first_date, *date), *cf))
        .collect();

    match newton(&year_flows) {
        Some(rate) if rate.is_finite() => rate,
        _ => bisection(&year_flows).filter(|r| r.is_finite()).unwrap_or(0.0),
    }
}

fn year_fraction(first: DateTime<Utc>, date: DateTime<Utc>) -> f64 {
    (date - first).num_seconds() as f64 / (DAYS_PER_YEAR * 86_400.0)
}

fn npv_and_derivative(flows: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let base = 1.0 + rate;
    if base <= 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let mut npv = 0.0;
    let mut dnpv = 0.0;
    for (years, cf) in flows {
        let discount = base.powf(*years);
        npv += cf / discount;
        dnpv -= years * cf / (discount * base);
    }
    (npv, dnpv)
}

fn initial_guess(flows: &[(f64, f64)]) -> f64 {
    let invested: f64 = flows.iter().filter(|(_, cf)| *cf < 0.0).map(|(_, cf)| -cf).sum();
    let received: f64 = flows.iter().filter(|(_, cf)| *cf > 0.0).map(|(_, cf)| *cf).sum();
    if invested > 0.0 {
        let ratio = received / invested - 1.0;
        if ratio > -0.9 && ratio < 10.0 {
            return ratio;
        }
    }
    0.1
}

/// Returns `None` on iteration failure (zero derivative, non-finite value,
/// or exhaustion of the iteration budget) so the caller can fall back to
/// bisection.
fn newton(flows: &[(f64, f64)]) -> Option<f64> {
    let mut rate = initial_guess(flows);

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let bounded_rate = rate.max(RATE_FLOOR);
        let (npv, dnpv) = npv_and_derivative(flows, bounded_rate);

        if !npv.is_finite() || !dnpv.is_finite() || dnpv.abs() < 1e-12 {
            return None;
        }
        if npv.abs() < NEWTON_TOLERANCE {
            return Some(bounded_rate);
        }

        let mut new_rate = bounded_rate - npv / dnpv;
        if !new_rate.is_finite() {
            return None;
        }
        new_rate = new_rate.clamp(RATE_FLOOR, RATE_CEIL);
        rate = new_rate;
    }

    None
}

/// Bisection over `[-0.99, 10]`. If the endpoints' NPVs share a sign the
/// method cannot proceed — this case is undefined and the caller maps it
/// to 0.
fn bisection(flows: &[(f64, f64)]) -> Option<f64> {
    let mut lo = BISECTION_LO;
    let mut hi = BISECTION_HI;

    let mut npv_lo = npv_and_derivative(flows, lo).0;
    let npv_hi = npv_and_derivative(flows, hi).0;
    if !npv_lo.is_finite() || !npv_hi.is_finite() {
        return None;
    }
    if npv_lo.signum() == npv_hi.signum() {
        return None;
    }

    for _ in 0..BISECTION_MAX_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let npv_mid = npv_and_derivative(flows, mid).0;
        if !npv_mid.is_finite() {
            return None;
        }
        if npv_mid.abs() < NEWTON_TOLERANCE {
            return Some(mid);
        }
        if npv_mid.signum() == npv_lo.signum() {
            lo = mid;
            npv_lo = npv_mid;
        } else {
            hi = mid;
        }
    }

    Some((lo + hi) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn empty_series_returns_zero() {
        assert_eq!(xirr(&[]), 0.0);
    }

    #[test]
    fn all_negative_flows_return_zero() {
        let now = Utc::now();
        assert_eq!(xirr(&[(now, -100.0), (now + Duration::days(30), -50.0)]), 0.0);
    }

    #[test]
    fn single_year_twenty_percent_gain() {
        let buy_date = Utc::now() - Duration::days(365);
        let today = Utc::now();
        let invested = -(100.0 * 40.0 + 10.0);
        let flows = vec![(buy_date, invested), (today, 4812.0)];

        let rate = xirr(&flows) * 100.0;
        assert!((rate - 20.0).abs() < 0.5, "expected ~20%, got {rate}");
    }

    #[test]
    fn zero_sum_series_converges_near_zero_rate() {
        let d0 = Utc::now() - Duration::days(365);
        let d1 = Utc::now();
        let flows = vec![(d0, -1000.0), (d1, 1000.0)];
        let rate = xirr(&flows);
        assert!(rate.abs() < 0.01, "expected near-zero rate, got {rate}");
    }
}

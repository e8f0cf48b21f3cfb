use chrono::{DateTime, Utc};
use serde::Serialize;

use super::stats;
use crate::simulation::types::PerformanceSample;

/// Return observations required before value-at-risk is reported
pub const VAR_MIN_OBSERVATIONS: usize = 21;

/// One point of the drawdown series: percent below the running peak
#[derive(Debug, Clone, Serialize)]
pub struct DrawdownPoint {
    pub timestamp: DateTime<Utc>,
    pub drawdown_pct: f64,
}

/// Risk profile of one agent's balance series. Volatility and VaR are in
/// percent; the Sharpe ratio is unitless.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskMetrics {
    pub volatility: f64,
    pub sharpe_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_at_risk_5pct: Option<f64>,
    pub drawdown_series: Vec<DrawdownPoint>,
}

/// Derive risk metrics from one agent's samples, in timestamp order.
/// Fewer than two points means no step returns exist, so everything
/// degrades to the empty default instead of failing.
pub fn compute_risk_metrics(series: &[PerformanceSample]) -> RiskMetrics {
    if series.len() < 2 {
        return RiskMetrics::default();
    }

    let balances: Vec<f64> = series.iter().map(|sample| sample.balance_usdt).collect();
    let returns = stats::step_returns(&balances);

    let volatility = stats::std_dev(&returns);
    let sharpe_ratio = if volatility == 0.0 {
        0.0
    } else {
        stats::mean(&returns) / volatility
    };

    let value_at_risk_5pct = if returns.len() >= VAR_MIN_OBSERVATIONS {
        Some(stats::percentile(&returns, 5.0))
    } else {
        None
    };

    RiskMetrics {
        volatility,
        sharpe_ratio,
        value_at_risk_5pct,
        drawdown_series: drawdown_series(series),
    }
}

/// Percent below the running peak at each point, 0 at every new high
fn drawdown_series(series: &[PerformanceSample]) -> Vec<DrawdownPoint> {
    let mut points = Vec::with_capacity(series.len());
    let mut running_max = f64::MIN;

    for sample in series {
        running_max = running_max.max(sample.balance_usdt);
        points.push(DrawdownPoint {
            timestamp: sample.timestamp,
            drawdown_pct: (sample.balance_usdt - running_max) / running_max * 100.0,
        });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::TradingAgent;
    use chrono::{Duration, TimeZone};

    fn make_series(balances: &[f64]) -> Vec<PerformanceSample> {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        balances
            .iter()
            .enumerate()
            .map(|(i, &balance_usdt)| PerformanceSample {
                timestamp: start + Duration::hours(i as i64),
                agent: TradingAgent::Ai,
                balance_usdt,
                roi_eff: (balance_usdt - 10_000.0) / 10_000.0 * 100.0,
                trade_count: 1,
            })
            .collect()
    }

    #[test]
    fn drawdown_tracks_the_running_peak() {
        let series = make_series(&[10_000.0, 11_000.0, 9_000.0, 9_500.0]);
        let metrics = compute_risk_metrics(&series);
        let drawdowns: Vec<f64> = metrics
            .drawdown_series
            .iter()
            .map(|p| p.drawdown_pct)
            .collect();

        assert_eq!(drawdowns[0], 0.0);
        assert_eq!(drawdowns[1], 0.0);
        assert_eq!(drawdowns[2], (9_000.0 - 11_000.0) / 11_000.0 * 100.0);
        assert_eq!(drawdowns[3], (9_500.0 - 11_000.0) / 11_000.0 * 100.0);
        assert!(drawdowns.iter().all(|d| *d <= 0.0));
    }

    #[test]
    fn flat_series_has_zero_sharpe_and_volatility() {
        let series = make_series(&[10_000.0; 25]);
        let metrics = compute_risk_metrics(&series);

        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert!(metrics.drawdown_series.iter().all(|p| p.drawdown_pct == 0.0));
    }

    #[test]
    fn var_needs_more_than_twenty_observations() {
        // 21 balances give 20 returns, one short of the threshold
        let short: Vec<f64> = (0..21).map(|i| 10_000.0 + i as f64 * 10.0).collect();
        assert!(compute_risk_metrics(&make_series(&short)).value_at_risk_5pct.is_none());

        // 22 balances give 21 returns
        let long: Vec<f64> = (0..22).map(|i| 10_000.0 + i as f64 * 10.0).collect();
        let metrics = compute_risk_metrics(&make_series(&long));
        assert!(metrics.value_at_risk_5pct.is_some());
    }

    #[test]
    fn too_short_series_degrade_to_empty_metrics() {
        for series in [make_series(&[]), make_series(&[10_000.0])] {
            let metrics = compute_risk_metrics(&series);
            assert_eq!(metrics.volatility, 0.0);
            assert_eq!(metrics.sharpe_ratio, 0.0);
            assert!(metrics.value_at_risk_5pct.is_none());
            assert!(metrics.drawdown_series.is_empty());
        }
    }
}

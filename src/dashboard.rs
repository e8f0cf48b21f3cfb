use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::Config;
use crate::market_data::provider::MarketSnapshotProvider;
use crate::market_data::types::{DEFAULT_UNIVERSE, MarketSnapshot};
use crate::risk::metrics::{RiskMetrics, compute_risk_metrics};
use crate::simulation::constants::INITIAL_BALANCE_USDT;
use crate::simulation::simulator::PerformanceSimulator;
use crate::simulation::types::{PerformanceSample, TradingAgent, agent_series};

/// One metrics-table row for an agent
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSummary {
    pub agent: TradingAgent,
    pub final_balance_usdt: f64,
    pub roi_eff: f64,
    pub total_trades: u64,
    pub max_drawdown_pct: f64,
}

/// Everything one render cycle hands to the view layer
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub generated_at: DateTime<Utc>,
    pub market: MarketSnapshot,
    pub performance: Vec<PerformanceSample>,
    pub risk: HashMap<TradingAgent, RiskMetrics>,
    pub summaries: Vec<PerformanceSummary>,
}

/// Read-only boundary between the data core and the view layer. Owns the
/// simulator and the snapshot provider; cycles run strictly one at a time.
pub struct DashboardManager {
    window_days: u32,
    simulator: PerformanceSimulator,
    provider: MarketSnapshotProvider,
}

impl DashboardManager {
    pub fn new(config: &Config) -> Self {
        let cache_ttl = Duration::from_secs(config.snapshot_cache_ttl_secs);
        let instruments = DEFAULT_UNIVERSE.to_vec();

        let (simulator, provider) = match config.sim_seed {
            Some(seed) => (
                PerformanceSimulator::with_seed(seed),
                // Offset so the provider's draw stream does not mirror the simulator's
                MarketSnapshotProvider::with_seed(
                    config.price_api_base_url.clone(),
                    instruments,
                    cache_ttl,
                    seed.wrapping_add(1),
                ),
            ),
            None => (
                PerformanceSimulator::new(),
                MarketSnapshotProvider::new(config.price_api_base_url.clone(), instruments, cache_ttl),
            ),
        };

        Self {
            window_days: config.perf_window_days,
            simulator,
            provider,
        }
    }

    /// Simulated performance series for every agent over the trailing window
    pub fn performance_series(&mut self, window_days: u32) -> Vec<PerformanceSample> {
        self.simulator.generate_series(window_days)
    }

    /// Current market snapshot for the instrument universe
    pub async fn market_snapshot(&mut self, force_refresh: bool) -> MarketSnapshot {
        self.provider.market_snapshot(force_refresh).await
    }

    /// Risk metrics for one agent's samples
    pub fn risk_metrics(&self, series: &[PerformanceSample]) -> RiskMetrics {
        compute_risk_metrics(series)
    }

    /// Run one full render pass: snapshot, series, per-agent metrics and summaries
    #[instrument(skip(self), fields(timed = true))]
    pub async fn render_cycle(&mut self) -> RenderFrame {
        let market = self.market_snapshot(false).await;
        let performance = self.performance_series(self.window_days);

        let mut risk = HashMap::new();
        let mut summaries = Vec::with_capacity(TradingAgent::ALL.len());
        for agent in TradingAgent::ALL {
            let series = agent_series(&performance, agent);
            let metrics = self.risk_metrics(&series);
            summaries.push(summarize(agent, &series, &metrics));
            risk.insert(agent, metrics);
        }

        info!(
            instrument_count = market.len(),
            sample_count = performance.len(),
            "Render cycle completed"
        );

        RenderFrame {
            generated_at: Utc::now(),
            market,
            performance,
            risk,
            summaries,
        }
    }
}

fn summarize(
    agent: TradingAgent,
    series: &[PerformanceSample],
    metrics: &RiskMetrics,
) -> PerformanceSummary {
    let last = series.last();
    PerformanceSummary {
        agent,
        final_balance_usdt: last.map(|s| s.balance_usdt).unwrap_or(INITIAL_BALANCE_USDT),
        roi_eff: last.map(|s| s.roi_eff).unwrap_or(0.0),
        total_trades: series.iter().map(|s| s.trade_count as u64).sum(),
        max_drawdown_pct: metrics
            .drawdown_series
            .iter()
            .map(|p| p.drawdown_pct)
            .fold(0.0, f64::min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> Config {
        Config {
            perf_window_days: 2,
            auto_refresh: false,
            refresh_interval_secs: 30,
            price_api_base_url: "http://127.0.0.1:1".to_string(),
            snapshot_cache_ttl_secs: 300,
            sim_seed: Some(11),
        }
    }

    #[tokio::test]
    async fn render_cycle_covers_every_agent() {
        let mut manager = DashboardManager::new(&offline_config());
        let frame = manager.render_cycle().await;

        let per_agent = 2 * 24 + 1;
        assert_eq!(frame.performance.len(), per_agent * TradingAgent::ALL.len());
        assert_eq!(frame.summaries.len(), TradingAgent::ALL.len());
        for agent in TradingAgent::ALL {
            assert!(frame.risk.contains_key(&agent));
        }
    }

    #[tokio::test]
    async fn summaries_track_the_series_tail() {
        let mut manager = DashboardManager::new(&offline_config());
        let frame = manager.render_cycle().await;

        for summary in &frame.summaries {
            let series = agent_series(&frame.performance, summary.agent);
            let last = series.last().unwrap();

            assert_eq!(summary.final_balance_usdt, last.balance_usdt);
            assert_eq!(summary.roi_eff, last.roi_eff);
            assert_eq!(
                summary.total_trades,
                series.iter().map(|s| s.trade_count as u64).sum::<u64>()
            );
            assert!(summary.max_drawdown_pct <= 0.0);
        }
    }
}

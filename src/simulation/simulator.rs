use chrono::{Duration, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use tracing::debug;

use super::constants::{BALANCE_FLOOR_USDT, INITIAL_BALANCE_USDT, WALK_PARAMETERS};
use super::types::{PerformanceSample, TradingAgent};

/// Random-walk generator for agent performance series. All randomness
/// flows through one owned rng so a fixed seed pins the full output.
pub struct PerformanceSimulator {
    rng: StdRng,
}

impl PerformanceSimulator {
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Simulate the hourly series for every agent over the trailing window.
    /// Each agent gets `24 * window_days + 1` samples: the baseline at the
    /// start of the window plus one per hourly step, the last landing on now.
    pub fn generate_series(&mut self, window_days: u32) -> Vec<PerformanceSample> {
        let now = Utc::now();
        let start = now - Duration::days(window_days as i64);
        let steps = window_days as usize * 24;

        let mut samples = Vec::with_capacity((steps + 1) * TradingAgent::ALL.len());

        for agent in TradingAgent::ALL {
            let (mean, std_dev, max_trades) = walk_parameters(agent);
            let step_return = Normal::new(mean, std_dev).unwrap();
            let mut balance = INITIAL_BALANCE_USDT;

            samples.push(PerformanceSample {
                timestamp: start,
                agent,
                balance_usdt: balance,
                roi_eff: 0.0,
                trade_count: 0,
            });

            // Walk hour by hour, compounding the drawn return
            for step in 1..=steps {
                let draw = step_return.sample(&mut self.rng);
                balance = (balance * (1.0 + draw)).max(BALANCE_FLOOR_USDT);

                samples.push(PerformanceSample {
                    timestamp: start + Duration::hours(step as i64),
                    agent,
                    balance_usdt: balance,
                    roi_eff: (balance - INITIAL_BALANCE_USDT) / INITIAL_BALANCE_USDT * 100.0,
                    trade_count: self.rng.random_range(0..=max_trades),
                });
            }
        }

        debug!(
            sample_count = samples.len(),
            window_days,
            "Simulated performance series generated"
        );
        samples
    }
}

/// Get walk parameters for an agent profile
fn walk_parameters(agent: TradingAgent) -> (f64, f64, u32) {
    WALK_PARAMETERS
        .iter()
        .find(|(candidate, _)| *candidate == agent)
        .map(|(_, params)| *params)
        .expect("Walk parameters not found for agent")
}

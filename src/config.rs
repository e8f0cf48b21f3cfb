use dotenvy::dotenv;
use std::env;

/// Runtime configuration for the dashboard data core. Every knob has a
/// default, so running without a .env file is fine.
pub struct Config {
    pub perf_window_days: u32,
    pub auto_refresh: bool,
    pub refresh_interval_secs: u64,
    pub price_api_base_url: String,
    pub snapshot_cache_ttl_secs: u64,
    pub sim_seed: Option<u64>,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();

        let perf_window_days = match env::var("PERF_WINDOW_DAYS") {
            Ok(value) => value.parse().expect("Invalid PERF_WINDOW_DAYS (must be a positive integer)"),
            Err(_) => 30,
        };

        let auto_refresh = env::var("AUTO_REFRESH").unwrap_or_else(|_| "true".to_string()) == "true";

        let refresh_interval_secs = match env::var("REFRESH_INTERVAL_SECS") {
            Ok(value) => value.parse().expect("Invalid REFRESH_INTERVAL_SECS (must be seconds)"),
            Err(_) => 30,
        };

        let price_api_base_url = env::var("PRICE_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string());

        let snapshot_cache_ttl_secs = match env::var("SNAPSHOT_CACHE_TTL_SECS") {
            Ok(value) => value.parse().expect("Invalid SNAPSHOT_CACHE_TTL_SECS (must be seconds)"),
            Err(_) => 300,
        };

        let sim_seed = env::var("SIM_SEED")
            .ok()
            .map(|value| value.parse().expect("Invalid SIM_SEED (must be a u64)"));

        Config {
            perf_window_days,
            auto_refresh,
            refresh_interval_secs,
            price_api_base_url,
            snapshot_cache_ttl_secs,
            sim_seed,
        }
    }
}

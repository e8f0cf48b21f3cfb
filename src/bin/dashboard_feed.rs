use crypto_trading_dashboard::config;
use crypto_trading_dashboard::dashboard::{DashboardManager, RenderFrame};
use crypto_trading_dashboard::logging;

use dotenvy::dotenv;
use std::time::Duration;
use tracing::{debug, info, instrument};

#[instrument(name = "dashboard_feed_main")]
#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    // Load configuration
    let cfg = config::Config::load();
    info!(
        window_days = cfg.perf_window_days,
        auto_refresh = cfg.auto_refresh,
        refresh_interval_secs = cfg.refresh_interval_secs,
        "Configuration loaded and logging initialized"
    );

    let mut manager = DashboardManager::new(&cfg);

    // One-shot mode: render a single frame and exit
    if !cfg.auto_refresh {
        let frame = manager.render_cycle().await;
        log_frame(&frame);
        return Ok(());
    }

    info!(interval_secs = cfg.refresh_interval_secs, "Starting periodic refresh loop");
    loop {
        let frame = manager.render_cycle().await;
        log_frame(&frame);
        tokio::time::sleep(Duration::from_secs(cfg.refresh_interval_secs)).await;
    }
}

fn log_frame(frame: &RenderFrame) {
    for (symbol, point) in &frame.market {
        debug!(
            symbol = %symbol,
            price = point.price,
            change_24h = point.change_24h,
            "Instrument quote"
        );
    }
    for summary in &frame.summaries {
        info!(
            agent = %summary.agent,
            final_balance_usdt = summary.final_balance_usdt,
            roi_eff = summary.roi_eff,
            total_trades = summary.total_trades,
            max_drawdown_pct = summary.max_drawdown_pct,
            "Agent performance summary"
        );
    }
    if let Ok(serialized) = serde_json::to_string(frame) {
        debug!(frame = %serialized, "Render frame serialized");
    }
}

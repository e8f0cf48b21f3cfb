//! Data core for a crypto trading dashboard: simulated agent performance
//! series, live-or-synthetic market snapshots, and the risk metrics the
//! view layer turns into charts and tables.

pub mod config;
pub mod dashboard;
pub mod logging;
pub mod market_data;
pub mod risk;
pub mod simulation;

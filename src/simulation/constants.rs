use super::types::TradingAgent;

// --- SIMULATION CONSTANTS ---
/// Starting balance for every simulated agent, in USDT
pub const INITIAL_BALANCE_USDT: f64 = 10_000.0;
/// Floor applied after each multiplicative step so a balance never reaches zero
pub const BALANCE_FLOOR_USDT: f64 = 0.01;

// --- AGENT WALK PARAMETERS ---
/// Per-agent (mean, std_dev, max_trades) for each hourly random-walk step
pub const WALK_PARAMETERS: [(TradingAgent, (f64, f64, u32)); 2] = [
    (TradingAgent::Ai, (0.001, 0.02, 4)),  // Stable profile
    (TradingAgent::Rl, (0.002, 0.05, 7)),  // Aggressive profile
];

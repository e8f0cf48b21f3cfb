use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Live or synthetic quote for one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub symbol: String,
    pub price: f64,
    pub change_24h: f64,
}

/// Snapshot of the whole instrument universe, keyed by display symbol
pub type MarketSnapshot = HashMap<String, PricePoint>;

/// Instrument universe entry: display symbol, quote API id, and the
/// base price the synthetic fallback perturbs.
#[derive(Debug, Clone)]
pub struct Instrument {
    pub symbol: &'static str,
    pub quote_id: &'static str,
    pub base_price_usd: f64,
}

/// Default instrument universe shown on the dashboard
pub const DEFAULT_UNIVERSE: [Instrument; 4] = [
    Instrument { symbol: "BTC", quote_id: "bitcoin", base_price_usd: 43_000.0 },
    Instrument { symbol: "ETH", quote_id: "ethereum", base_price_usd: 2_300.0 },
    Instrument { symbol: "SOL", quote_id: "solana", base_price_usd: 98.0 },
    Instrument { symbol: "BNB", quote_id: "binancecoin", base_price_usd: 310.0 },
];

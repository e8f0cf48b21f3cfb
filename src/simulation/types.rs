use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingAgent {
    Ai,
    Rl,
}

impl TradingAgent {
    /// Every simulated agent, in generation order
    pub const ALL: [TradingAgent; 2] = [TradingAgent::Ai, TradingAgent::Rl];

    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "ai" => Some(Self::Ai),
            "rl" => Some(Self::Rl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Rl => "rl",
        }
    }

    /// Human-readable name for tables and chart legends
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ai => "AI Agent",
            Self::Rl => "RL Agent",
        }
    }
}

impl std::fmt::Display for TradingAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One hourly point of an agent's simulated performance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub timestamp: DateTime<Utc>,
    pub agent: TradingAgent,
    pub balance_usdt: f64,
    pub roi_eff: f64,
    pub trade_count: u32,
}

/// One agent's samples out of a combined series, in timestamp order
pub fn agent_series(samples: &[PerformanceSample], agent: TradingAgent) -> Vec<PerformanceSample> {
    samples
        .iter()
        .filter(|sample| sample.agent == agent)
        .cloned()
        .collect()
}

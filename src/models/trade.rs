//! Trade inputs and the figures computed from them.

use serde::{Deserialize, Serialize};

/// Direction of an options trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "buy",
            TradeType::Sell => "sell",
        }
    }

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

/// Validated parameters of a single trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeInputs {
    /// Option price sensitivity to the underlying
    pub delta: f64,

    /// Per-day time decay, usually negative
    pub theta: f64,

    /// Intended holding period in minutes
    pub trade_time: f64,

    /// Currency amount at risk
    pub risk: f64,

    /// Currency amount targeted
    pub reward: f64,

    /// Entry price per option
    pub entry: f64,

    pub trade_type: TradeType,
}

/// Figures derived from [`TradeInputs`], at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeResults {
    pub trade_decay: f64,
    pub exit_take_profit: f64,
    pub exit_stop_loss: f64,
    pub risk_amount: f64,
    pub reward_amount: f64,
}

//! Risk policy configuration.

use serde::{Deserialize, Serialize};

use crate::models::AccountConfig;

/// Thresholds used to classify trade risk, and the factory account defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Fraction of the allowed maximum above which a trade is flagged (exclusive)
    pub warning_ratio: f64,

    /// Fraction of the allowed maximum above which a trade is rejected (exclusive)
    pub limit_ratio: f64,

    /// Capital written by an explicit reset
    pub default_total_capital: f64,

    /// Risk percentage written by an explicit reset
    pub default_risk_per_trade_percentage: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            warning_ratio: 0.8,                     // Warn above 80% of max
            limit_ratio: 1.0,                       // Reject above 100% of max
            default_total_capital: 10_000.0,        // $10,000
            default_risk_per_trade_percentage: 2.0, // 2% per trade
        }
    }
}

impl RiskPolicy {
    /// Configuration written when an account is reset.
    pub fn factory_account(&self) -> AccountConfig {
        AccountConfig::new(
            self.default_total_capital,
            self.default_risk_per_trade_percentage,
        )
    }
}

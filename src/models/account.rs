//! Account-level risk configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capital and per-trade risk budget for an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Total trading capital in currency units
    pub total_capital: f64,

    /// Share of capital allowed per trade, as a percentage (2.0 = 2%)
    pub risk_per_trade_percentage: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountConfig {
    pub fn new(total_capital: f64, risk_per_trade_percentage: f64) -> Self {
        let now = Utc::now();
        Self {
            total_capital,
            risk_per_trade_percentage,
            created_at: now,
            updated_at: now,
        }
    }

    /// Largest risk a single trade may carry.
    pub fn max_risk_per_trade(&self) -> f64 {
        self.total_capital * self.risk_per_trade_percentage / 100.0
    }

    /// Apply a partial update, refreshing `updated_at`.
    pub fn merged(&self, update: &ConfigUpdate) -> Self {
        Self {
            total_capital: update.total_capital.unwrap_or(self.total_capital),
            risk_per_trade_percentage: update
                .risk_per_trade_percentage
                .unwrap_or(self.risk_per_trade_percentage),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// Fields supplied on an explicit save. Absent fields keep their stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub total_capital: Option<f64>,
    pub risk_per_trade_percentage: Option<f64>,
}

//! Risk validation of a trade against an account's per-trade budget.

use tracing::{debug, warn};

use crate::models::{AccountConfig, RiskValidation, Severity};

use super::RiskPolicy;

/// Classifies trade risk as OK, WARNING or ERROR.
///
/// Both thresholds are exclusive: a trade at exactly 80% of the allowed
/// maximum is OK, and a trade at exactly the maximum is a WARNING.
#[derive(Debug, Clone, Default)]
pub struct RiskValidator {
    policy: RiskPolicy,
}

impl RiskValidator {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Compare a trade's risk against the account's allowed maximum.
    pub fn validate(&self, trade_risk_amount: f64, account: &AccountConfig) -> RiskValidation {
        let max_allowed_risk = account.max_risk_per_trade();
        let risk_percentage_of_capital = trade_risk_amount / account.total_capital * 100.0;
        let configured_max_percentage = account.risk_per_trade_percentage;
        let is_over_limit = trade_risk_amount > max_allowed_risk * self.policy.limit_ratio;

        let (severity, warning_message) = if is_over_limit {
            warn!(
                risk = trade_risk_amount,
                max = max_allowed_risk,
                "Trade risk exceeds account limit"
            );
            (
                Severity::Error,
                format!(
                    "Risk limit exceeded: risk amount ${:.2} exceeds maximum allowed ${:.2} ({:.2}% > {}% of capital)",
                    trade_risk_amount,
                    max_allowed_risk,
                    risk_percentage_of_capital,
                    configured_max_percentage
                ),
            )
        } else if trade_risk_amount > max_allowed_risk * self.policy.warning_ratio {
            debug!(
                risk = trade_risk_amount,
                max = max_allowed_risk,
                "Trade risk approaching account limit"
            );
            (
                Severity::Warning,
                format!(
                    "High risk warning: risk amount ${:.2} is approaching the limit of ${:.2} ({:.2}% of {}% max)",
                    trade_risk_amount,
                    max_allowed_risk,
                    risk_percentage_of_capital,
                    configured_max_percentage
                ),
            )
        } else {
            (
                Severity::Ok,
                format!(
                    "Risk within limits: ${:.2} ({:.2}% of capital)",
                    trade_risk_amount, risk_percentage_of_capital
                ),
            )
        };

        RiskValidation {
            severity,
            warning_message,
            is_valid: severity != Severity::Error,
            risk_amount: trade_risk_amount,
            max_allowed_risk,
            risk_percentage_of_capital,
            configured_max_percentage,
            is_over_limit,
        }
    }
}

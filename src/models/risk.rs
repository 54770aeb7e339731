//! Risk classification and position sizing outputs.

use serde::{Deserialize, Serialize};

/// How close a trade's risk sits to the account limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Within acceptable risk
    #[serde(rename = "success")]
    Ok,
    /// Close to the limit
    Warning,
    /// Over the limit
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Outcome of checking a trade's risk against an account configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskValidation {
    pub severity: Severity,
    pub warning_message: String,
    pub is_valid: bool,
    pub risk_amount: f64,
    pub max_allowed_risk: f64,
    pub risk_percentage_of_capital: f64,
    pub configured_max_percentage: f64,
    pub is_over_limit: bool,
}

/// Suggested contract count for a risk budget and a stop distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSuggestion {
    pub suggested_contracts: u64,
    pub risk_per_option: f64,
    pub actual_risk: f64,
    pub max_allowed_risk: f64,
}

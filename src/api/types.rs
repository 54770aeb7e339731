//! Response bodies produced by the dispatcher.
//!
//! Engine figures are full precision; rounding happens here, for display only.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::models::{AccountConfig, RiskValidation, TradeInputs, TradeResults};
use crate::trading::{BatchItem, PositionReport, PricedTrade};

/// Decimal places for trade decay.
pub const DECAY_DP: u32 = 6;
/// Decimal places for exit prices.
pub const EXIT_DP: u32 = 4;
/// Decimal places for currency amounts.
pub const MONEY_DP: u32 = 2;

/// Round half-to-even to `dp` places. Values outside the decimal range pass through.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(dp))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// Rounded view of [`TradeResults`].
#[derive(Debug, Serialize)]
pub struct ResultsView {
    pub trade_decay: f64,
    pub exit_take_profit: f64,
    pub exit_stop_loss: f64,
    pub risk_amount: f64,
    pub reward_amount: f64,
}

impl From<&TradeResults> for ResultsView {
    fn from(results: &TradeResults) -> Self {
        Self {
            trade_decay: round_dp(results.trade_decay, DECAY_DP),
            exit_take_profit: round_dp(results.exit_take_profit, EXIT_DP),
            exit_stop_loss: round_dp(results.exit_stop_loss, EXIT_DP),
            risk_amount: round_dp(results.risk_amount, MONEY_DP),
            reward_amount: round_dp(results.reward_amount, MONEY_DP),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub inputs: TradeInputs,
    pub results: ResultsView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_validation: Option<RiskValidation>,
}

impl From<PricedTrade> for CalculateResponse {
    fn from(priced: PricedTrade) -> Self {
        Self {
            success: true,
            inputs: priced.inputs,
            results: ResultsView::from(&priced.results),
            risk_validation: priced.risk_validation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub trade_index: usize,
    pub inputs: TradeInputs,
    pub results: ResultsView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_validation: Option<RiskValidation>,
}

#[derive(Debug, Serialize)]
pub struct BatchErrorDetail {
    pub trade_index: usize,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub processed_trades: usize,
    pub errors: usize,
    pub results: Vec<BatchResult>,
    pub errors_detail: Option<Vec<BatchErrorDetail>>,
}

impl From<Vec<BatchItem>> for BatchResponse {
    fn from(items: Vec<BatchItem>) -> Self {
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for item in items {
            match item.outcome {
                Ok(priced) => results.push(BatchResult {
                    trade_index: item.index,
                    inputs: priced.inputs,
                    results: ResultsView::from(&priced.results),
                    risk_validation: priced.risk_validation,
                }),
                Err(e) => errors.push(BatchErrorDetail {
                    trade_index: item.index,
                    error: e.to_string(),
                    missing_fields: e.missing_fields().map(<[String]>::to_vec),
                }),
            }
        }

        Self {
            success: true,
            processed_trades: results.len(),
            errors: errors.len(),
            results,
            errors_detail: if errors.is_empty() { None } else { Some(errors) },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub total_capital: f64,
    pub risk_per_trade_percentage: f64,
    pub max_risk_per_trade: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AccountConfig> for ConfigView {
    fn from(config: &AccountConfig) -> Self {
        Self {
            total_capital: config.total_capital,
            risk_per_trade_percentage: config.risk_per_trade_percentage,
            max_risk_per_trade: config.max_risk_per_trade(),
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub config: ConfigView,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub success: bool,
    pub validation: RiskValidation,
}

#[derive(Debug, Serialize)]
pub struct SuggestionView {
    pub suggested_contracts: u64,
    pub risk_per_option: f64,
    pub actual_risk: f64,
    pub max_allowed_risk: f64,
    pub entry_price: f64,
    pub stop_loss_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_capital: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_validation: Option<RiskValidation>,
}

#[derive(Debug, Serialize)]
pub struct PositionResponse {
    pub success: bool,
    pub suggestion: SuggestionView,
}

impl From<PositionReport> for PositionResponse {
    fn from(report: PositionReport) -> Self {
        Self {
            success: true,
            suggestion: SuggestionView {
                suggested_contracts: report.suggestion.suggested_contracts,
                risk_per_option: report.suggestion.risk_per_option,
                actual_risk: round_dp(report.suggestion.actual_risk, MONEY_DP),
                max_allowed_risk: report.suggestion.max_allowed_risk,
                entry_price: report.request.entry_price,
                stop_loss_price: report.request.stop_loss_price,
                total_capital: report.total_capital,
                risk_validation: report.risk_validation,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
}

impl From<&CoreError> for ErrorResponse {
    fn from(err: &CoreError) -> Self {
        let missing_fields = match err {
            CoreError::Validation(v) => v.missing_fields().map(<[String]>::to_vec),
            _ => None,
        };

        Self {
            error: err.to_string(),
            kind: err.kind().as_str(),
            missing_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(110.001041666, EXIT_DP), 110.001);
        assert_eq!(round_dp(-0.0010416666, DECAY_DP), -0.001042);
        assert_eq!(round_dp(99.999, MONEY_DP), 100.0);
        assert_eq!(round_dp(f64::MAX, MONEY_DP), f64::MAX);
    }

    #[test]
    fn test_results_view_rounds_each_field() {
        let view = ResultsView::from(&TradeResults {
            trade_decay: -0.001041666666,
            exit_take_profit: 110.00104166,
            exit_stop_loss: -39.99895833,
            risk_amount: 100.004,
            reward_amount: 200.0,
        });
        assert_eq!(view.trade_decay, -0.001042);
        assert_eq!(view.exit_take_profit, 110.001);
        assert_eq!(view.exit_stop_loss, -39.999);
        assert_eq!(view.risk_amount, 100.0);
    }
}

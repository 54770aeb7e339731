//! One trade taken from raw input to priced, risk-checked output.

use serde_json::Value;

use crate::error::ValidationError;
use crate::models::{AccountConfig, RiskValidation, TradeInputs, TradeResults};

use super::{pricing, validator, RiskValidator};

/// A validated trade with its computed figures.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedTrade {
    pub inputs: TradeInputs,
    pub results: TradeResults,
    /// Present only when the account has a saved configuration
    pub risk_validation: Option<RiskValidation>,
}

/// Validate, price and (when an account is configured) risk-check one trade.
pub fn quote(
    raw: &Value,
    account: Option<&AccountConfig>,
    risk_validator: &RiskValidator,
) -> Result<PricedTrade, ValidationError> {
    let inputs = validator::parse_trade(raw)?;
    let results = pricing::calculate(&inputs);
    let risk_validation = account.map(|config| risk_validator.validate(results.risk_amount, config));

    Ok(PricedTrade {
        inputs,
        results,
        risk_validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use serde_json::json;

    fn raw_trade(risk: f64) -> Value {
        json!({
            "delta": 0.5,
            "theta": -0.05,
            "trade_time": 30,
            "risk": risk,
            "reward": 200,
            "entry": 10.0,
            "trade_type": "buy"
        })
    }

    #[test]
    fn test_quote_without_account_skips_risk() {
        let priced = quote(&raw_trade(100.0), None, &RiskValidator::default()).unwrap();
        assert!(priced.risk_validation.is_none());
        assert_eq!(priced.results.risk_amount, 100.0);
    }

    #[test]
    fn test_quote_with_account_checks_risk() {
        let account = AccountConfig::new(10_000.0, 2.0);
        let priced = quote(&raw_trade(300.0), Some(&account), &RiskValidator::default()).unwrap();
        let validation = priced.risk_validation.unwrap();
        assert_eq!(validation.severity, Severity::Error);
        assert!(!validation.is_valid);
    }
}

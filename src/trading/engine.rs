//! Trade engine: wires the pure calculators to an account's stored configuration.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::db::ConfigStore;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::models::{AccountConfig, PositionSuggestion, RiskValidation};

use super::batch::{calculate_batch, BatchItem};
use super::quote::{quote, PricedTrade};
use super::validator::{self, SizingRequest};
use super::{PositionSizer, RiskPolicy, RiskValidator};

/// Position suggestion plus the account context it was computed against.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    pub request: SizingRequest,
    pub suggestion: PositionSuggestion,
    /// Capital of the configured account, if any
    pub total_capital: Option<f64>,
    /// Check of `actual_risk` against the configured account, if any
    pub risk_validation: Option<RiskValidation>,
}

/// Request-scoped operations for one account.
///
/// Holds no mutable state of its own; the store is the only shared resource
/// and is only written by explicit configuration saves.
pub struct TradeEngine {
    store: Arc<dyn ConfigStore>,
    account: String,
    risk_validator: RiskValidator,
}

impl TradeEngine {
    pub fn new(store: Arc<dyn ConfigStore>, account: impl Into<String>, policy: RiskPolicy) -> Self {
        Self {
            store,
            account: account.into(),
            risk_validator: RiskValidator::new(policy),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    async fn account_config(&self) -> CoreResult<Option<AccountConfig>> {
        Ok(self.store.get(&self.account).await?)
    }

    /// Price a single raw trade. Risk is checked only if the account is configured.
    pub async fn calculate(&self, raw: &Value) -> CoreResult<PricedTrade> {
        let account = self.account_config().await?;
        let priced = quote(raw, account.as_ref(), &self.risk_validator)?;

        debug!(
            trade_type = priced.inputs.trade_type.as_str(),
            decay = priced.results.trade_decay,
            take_profit = priced.results.exit_take_profit,
            stop_loss = priced.results.exit_stop_loss,
            "Trade priced"
        );
        Ok(priced)
    }

    /// Price every trade in a batch body, in input order.
    pub async fn calculate_batch(&self, raw: &Value) -> CoreResult<Vec<BatchItem>> {
        let account = self.account_config().await?;
        let items = calculate_batch(raw, account.as_ref(), &self.risk_validator)?;

        let failed = items.iter().filter(|item| !item.is_ok()).count();
        info!(total = items.len(), failed, "Batch calculated");
        Ok(items)
    }

    /// Suggest a contract count for a risk budget and stop distance.
    pub async fn suggest_position(&self, raw: &Value) -> CoreResult<PositionReport> {
        let request = validator::parse_sizing_request(raw)?;
        let suggestion = PositionSizer::size(
            request.risk_amount,
            request.entry_price,
            request.stop_loss_price,
        )?;

        let account = self.account_config().await?;
        let risk_validation = account
            .as_ref()
            .map(|config| self.risk_validator.validate(suggestion.actual_risk, config));

        Ok(PositionReport {
            request,
            suggestion,
            total_capital: account.map(|config| config.total_capital),
            risk_validation,
        })
    }

    /// Check a bare risk amount against the stored configuration.
    ///
    /// # Errors
    /// [`CoreError::ConfigurationMissing`] when nothing has been saved; no
    /// default capital is assumed.
    pub async fn validate_risk(&self, raw: &Value) -> CoreResult<RiskValidation> {
        let risk_amount = validator::parse_risk_amount(raw)?;
        let config = self.config().await?;
        Ok(self.risk_validator.validate(risk_amount, &config))
    }

    /// Stored configuration for this account.
    pub async fn config(&self) -> CoreResult<AccountConfig> {
        self.account_config()
            .await?
            .ok_or_else(|| CoreError::ConfigurationMissing(self.account.clone()))
    }

    /// Save a full or partial configuration.
    ///
    /// With nothing stored yet both fields are required; otherwise absent
    /// fields keep their stored values.
    pub async fn save_config(&self, raw: &Value) -> CoreResult<AccountConfig> {
        let update = validator::parse_config_update(raw)?;

        let config = match self.account_config().await? {
            Some(existing) => existing.merged(&update),
            None => match (update.total_capital, update.risk_per_trade_percentage) {
                (Some(total_capital), Some(percentage)) => {
                    AccountConfig::new(total_capital, percentage)
                }
                (capital, percentage) => {
                    let mut missing = Vec::new();
                    if capital.is_none() {
                        missing.push("total_capital".to_string());
                    }
                    if percentage.is_none() {
                        missing.push("risk_per_trade_percentage".to_string());
                    }
                    return Err(ValidationError::MissingFields(missing).into());
                }
            },
        };

        self.store.set(&self.account, &config).await?;
        info!(
            account = %self.account,
            total_capital = config.total_capital,
            risk_pct = config.risk_per_trade_percentage,
            "Account configuration saved"
        );

        self.config().await
    }

    /// Overwrite the configuration with the policy's factory defaults.
    pub async fn reset_config(&self) -> CoreResult<AccountConfig> {
        let defaults = self.risk_validator.policy().factory_account();
        self.store.set(&self.account, &defaults).await?;
        info!(account = %self.account, "Account configuration reset to defaults");

        self.config().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::error::{ErrorKind, InvalidPriceError};
    use crate::models::Severity;
    use serde_json::json;

    fn engine() -> TradeEngine {
        TradeEngine::new(Arc::new(MemoryStore::new()), "default", RiskPolicy::default())
    }

    fn trade(risk: f64) -> Value {
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

    #[tokio::test]
    async fn test_calculate_without_config_omits_risk() {
        let priced = engine().calculate(&trade(100.0)).await.unwrap();
        assert!(priced.risk_validation.is_none());
    }

    #[tokio::test]
    async fn test_calculate_with_config_checks_risk() {
        let engine = engine();
        engine
            .save_config(&json!({ "total_capital": 10000, "risk_per_trade_percentage": 2.0 }))
            .await
            .unwrap();

        let priced = engine.calculate(&trade(190.0)).await.unwrap();
        assert_eq!(priced.risk_validation.unwrap().severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_calculate_validation_error_kind() {
        let err = engine().calculate(&json!({ "delta": 1 })).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_validate_risk_requires_config() {
        let err = engine()
            .validate_risk(&json!({ "risk_amount": 100 }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
    }

    #[tokio::test]
    async fn test_first_save_requires_both_fields() {
        let err = engine()
            .save_config(&json!({ "total_capital": 5000 }))
            .await
            .unwrap_err();
        match err {
            CoreError::Validation(ValidationError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["risk_per_trade_percentage".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_partial_update_merges() {
        let engine = engine();
        engine
            .save_config(&json!({ "total_capital": 10000, "risk_per_trade_percentage": 2.0 }))
            .await
            .unwrap();
        let updated = engine
            .save_config(&json!({ "risk_per_trade_percentage": 1.5 }))
            .await
            .unwrap();

        assert_eq!(updated.total_capital, 10_000.0);
        assert_eq!(updated.risk_per_trade_percentage, 1.5);
    }

    #[tokio::test]
    async fn test_reset_writes_defaults() {
        let engine = engine();
        let config = engine.reset_config().await.unwrap();
        assert_eq!(config.total_capital, 10_000.0);
        assert_eq!(config.risk_per_trade_percentage, 2.0);
        assert_eq!(engine.config().await.unwrap().max_risk_per_trade(), 200.0);
    }

    #[tokio::test]
    async fn test_suggest_position() {
        let engine = engine();
        let report = engine
            .suggest_position(&json!({
                "risk_amount": 200,
                "entry_price": 10.0,
                "stop_loss_price": 8.0
            }))
            .await
            .unwrap();
        assert_eq!(report.suggestion.suggested_contracts, 100);
        assert!(report.risk_validation.is_none());
        assert!(report.total_capital.is_none());

        engine.reset_config().await.unwrap();
        let report = engine
            .suggest_position(&json!({
                "risk_amount": 200,
                "entry_price": 10.0,
                "stop_loss_price": 8.0
            }))
            .await
            .unwrap();
        assert_eq!(report.total_capital, Some(10_000.0));
        // 200 of a 200 max sits in the warning band
        assert_eq!(report.risk_validation.unwrap().severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_suggest_position_equal_prices() {
        let err = engine()
            .suggest_position(&json!({
                "risk_amount": 200,
                "entry_price": 10.0,
                "stop_loss_price": 10.0
            }))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidPrice(InvalidPriceError::EqualPrices(_))
        ));
        assert_eq!(err.kind(), ErrorKind::Computation);
    }

    #[tokio::test]
    async fn test_batch_through_engine() {
        let mut bad = trade(100.0);
        bad["trade_type"] = json!("invalid");
        let items = engine()
            .calculate_batch(&json!({ "trades": [trade(100.0), bad] }))
            .await
            .unwrap();
        assert!(items[0].is_ok());
        assert!(!items[1].is_ok());
    }
}

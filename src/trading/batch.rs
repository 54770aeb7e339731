//! Batch coordinator: prices many trades, isolating per-item failures.

use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::AccountConfig;

use super::quote::{quote, PricedTrade};
use super::{validator, RiskValidator};

/// Result for one position of the input sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub index: usize,
    pub outcome: Result<PricedTrade, ValidationError>,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Price every trade under the `trades` key of `raw`.
///
/// Items are independent and evaluated in parallel; the returned sequence is
/// in input order. A bad item is recorded against its index and does not stop
/// the rest.
///
/// # Errors
/// Fails only when the body is not an object, `trades` is not an array, or
/// the array is empty.
pub fn calculate_batch(
    raw: &Value,
    account: Option<&AccountConfig>,
    risk_validator: &RiskValidator,
) -> Result<Vec<BatchItem>, ValidationError> {
    let map = validator::as_object(raw)?;
    let trades = map
        .get("trades")
        .and_then(Value::as_array)
        .ok_or(ValidationError::TradesNotArray)?;

    if trades.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    let items: Vec<BatchItem> = trades
        .par_iter()
        .enumerate()
        .map(|(index, trade)| {
            let outcome = quote(trade, account, risk_validator);
            if let Err(e) = &outcome {
                debug!(index, error = %e, "Batch item rejected");
            }
            BatchItem { index, outcome }
        })
        .collect();

    Ok(items)
}

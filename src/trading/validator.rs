//! Normalization and range checks for raw request fields.
//!
//! Raw input is a JSON object. Numeric fields accept JSON numbers or numeric
//! strings; every failure names the offending field and nothing is silently
//! corrected.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::{ConfigUpdate, TradeInputs, TradeType};

/// Fields every single-trade request must carry.
pub const TRADE_FIELDS: [&str; 7] = [
    "delta",
    "theta",
    "trade_time",
    "risk",
    "reward",
    "entry",
    "trade_type",
];

/// Fields of a position sizing request.
pub const SIZING_FIELDS: [&str; 3] = ["risk_amount", "entry_price", "stop_loss_price"];

/// Parsed position sizing request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingRequest {
    pub risk_amount: f64,
    pub entry_price: f64,
    pub stop_loss_price: f64,
}

/// Borrow the body as an object.
pub fn as_object(raw: &Value) -> Result<&Map<String, Value>, ValidationError> {
    raw.as_object().ok_or(ValidationError::NotAnObject)
}

/// Fail with every absent field listed, in the order given.
pub fn require_fields(map: &Map<String, Value>, fields: &[&str]) -> Result<(), ValidationError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|field| !map.contains_key(**field))
        .map(|field| field.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

/// Coerce one value to a finite float.
fn coerce_number(field: &str, value: &Value) -> Result<f64, ValidationError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ValidationError::NotNumeric {
        field: field.to_string(),
    })?;

    if !number.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
            value: number,
        });
    }

    Ok(number)
}

/// Read a required numeric field.
pub fn number(map: &Map<String, Value>, field: &str) -> Result<f64, ValidationError> {
    match map.get(field) {
        Some(value) => coerce_number(field, value),
        None => Err(ValidationError::MissingFields(vec![field.to_string()])),
    }
}

/// Read an optional numeric field. `null` counts as absent.
pub fn optional_number(
    map: &Map<String, Value>,
    field: &str,
) -> Result<Option<f64>, ValidationError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_number(field, value).map(Some),
    }
}

fn trade_type(map: &Map<String, Value>) -> Result<TradeType, ValidationError> {
    match map.get("trade_type") {
        Some(Value::String(s)) => {
            TradeType::parse(s).ok_or_else(|| ValidationError::InvalidTradeType(s.clone()))
        }
        Some(other) => Err(ValidationError::InvalidTradeType(other.to_string())),
        None => Err(ValidationError::MissingFields(vec!["trade_type".to_string()])),
    }
}

fn at_least_zero(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value < 0.0 {
        return Err(ValidationError::out_of_range(field, value, ">= 0"));
    }
    Ok(value)
}

fn positive(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value <= 0.0 {
        return Err(ValidationError::out_of_range(field, value, "> 0"));
    }
    Ok(value)
}

/// Validate a raw single-trade mapping into typed inputs.
pub fn parse_trade(raw: &Value) -> Result<TradeInputs, ValidationError> {
    let map = as_object(raw)?;
    require_fields(map, &TRADE_FIELDS)?;

    let trade_type = trade_type(map)?;

    Ok(TradeInputs {
        delta: number(map, "delta")?,
        theta: number(map, "theta")?,
        trade_time: at_least_zero("trade_time", number(map, "trade_time")?)?,
        risk: positive("risk", number(map, "risk")?)?,
        reward: positive("reward", number(map, "reward")?)?,
        entry: positive("entry", number(map, "entry")?)?,
        trade_type,
    })
}

/// Validate a position sizing request. Price sanity is left to the sizer.
pub fn parse_sizing_request(raw: &Value) -> Result<SizingRequest, ValidationError> {
    let map = as_object(raw)?;
    require_fields(map, &SIZING_FIELDS)?;

    Ok(SizingRequest {
        risk_amount: at_least_zero("risk_amount", number(map, "risk_amount")?)?,
        entry_price: number(map, "entry_price")?,
        stop_loss_price: number(map, "stop_loss_price")?,
    })
}

/// Validate a standalone risk check request.
pub fn parse_risk_amount(raw: &Value) -> Result<f64, ValidationError> {
    let map = as_object(raw)?;
    require_fields(map, &["risk_amount"])?;
    at_least_zero("risk_amount", number(map, "risk_amount")?)
}

/// Validate a configuration save. Either field may be omitted.
pub fn parse_config_update(raw: &Value) -> Result<ConfigUpdate, ValidationError> {
    let map = as_object(raw)?;

    let total_capital = optional_number(map, "total_capital")?
        .map(|value| positive("total_capital", value))
        .transpose()?;

    let risk_per_trade_percentage = optional_number(map, "risk_per_trade_percentage")?
        .map(|value| {
            if value <= 0.0 || value > 100.0 {
                Err(ValidationError::out_of_range(
                    "risk_per_trade_percentage",
                    value,
                    "between 0 (exclusive) and 100",
                ))
            } else {
                Ok(value)
            }
        })
        .transpose()?;

    Ok(ConfigUpdate {
        total_capital,
        risk_per_trade_percentage,
    })
}

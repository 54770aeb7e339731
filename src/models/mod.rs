//! Data models for trades, account configuration and risk outputs.

mod account;
mod risk;
mod trade;

pub use account::{AccountConfig, ConfigUpdate};
pub use risk::{PositionSuggestion, RiskValidation, Severity};
pub use trade::{TradeInputs, TradeResults, TradeType};

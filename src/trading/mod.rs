//! Trade calculations: validation, pricing, risk checks, sizing and batches.

mod batch;
mod config;
mod engine;
mod position_sizer;
mod pricing;
mod quote;
mod risk;
mod validator;

pub use batch::BatchItem;
pub use config::RiskPolicy;
pub use engine::{PositionReport, TradeEngine};
pub use position_sizer::PositionSizer;
pub use quote::PricedTrade;
pub use risk::RiskValidator;

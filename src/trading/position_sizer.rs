//! Position sizing: contracts that fit a risk budget for a given stop distance.

use crate::error::InvalidPriceError;
use crate::models::PositionSuggestion;

/// Largest contract count reported: the greatest f64 below 2^64, so it casts
/// to u64 without saturating.
pub const MAX_CONTRACTS: f64 = 18_446_744_073_709_549_568.0;

/// Calculator for suggested contract counts.
pub struct PositionSizer;

impl PositionSizer {
    /// Suggest how many contracts to trade.
    ///
    /// Risk per option is the distance between entry and stop. The count is
    /// floored so `actual_risk` never exceeds `risk_budget`; a budget below one
    /// option's risk yields zero contracts. Absurdly tight stops saturate the
    /// count at [`MAX_CONTRACTS`], and `actual_risk` is always computed from
    /// the reported count.
    ///
    /// # Errors
    /// Returns [`InvalidPriceError`] if either price is not a positive finite
    /// number or the two prices are equal.
    pub fn size(
        risk_budget: f64,
        entry_price: f64,
        stop_loss_price: f64,
    ) -> Result<PositionSuggestion, InvalidPriceError> {
        check_price("entry_price", entry_price)?;
        check_price("stop_loss_price", stop_loss_price)?;
        if entry_price == stop_loss_price {
            return Err(InvalidPriceError::EqualPrices(entry_price));
        }

        let risk_per_option = (entry_price - stop_loss_price).abs();

        let contracts = if risk_budget > 0.0 {
            let mut contracts = (risk_budget / risk_per_option).floor().min(MAX_CONTRACTS);
            // Division can round up onto the next integer
            while contracts > 0.0 && contracts * risk_per_option > risk_budget {
                contracts = step_down(contracts);
            }
            contracts.max(0.0)
        } else {
            0.0
        };

        // Exact: MAX_CONTRACTS and every smaller whole float fit in u64
        let suggested_contracts = contracts as u64;

        Ok(PositionSuggestion {
            suggested_contracts,
            risk_per_option,
            actual_risk: suggested_contracts as f64 * risk_per_option,
            max_allowed_risk: risk_budget,
        })
    }
}

/// Next whole number below a positive whole float. Above 2^53 that is one ulp
/// down rather than `x - 1.0`, which would round back to `x`.
fn step_down(contracts: f64) -> f64 {
    let minus_one = contracts - 1.0;
    if minus_one < contracts {
        minus_one
    } else {
        f64::from_bits(contracts.to_bits() - 1).floor()
    }
}

fn check_price(field: &'static str, value: f64) -> Result<(), InvalidPriceError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(InvalidPriceError::NonPositive { field, value });
    }
    Ok(())
}

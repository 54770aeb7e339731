//! Pricing engine: time decay and exit levels for a single trade.

use crate::models::{TradeInputs, TradeResults, TradeType};

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Decay accrued over `trade_time` minutes at a per-day `theta`.
pub fn trade_decay(theta: f64, trade_time: f64) -> f64 {
    theta / MINUTES_PER_DAY * trade_time
}

/// Take-profit exit price.
///
/// BUY: `entry + delta * reward - decay`
/// SELL: `entry - delta * reward - decay`
pub fn exit_take_profit(
    entry: f64,
    delta: f64,
    reward: f64,
    trade_decay: f64,
    trade_type: TradeType,
) -> f64 {
    match trade_type {
        TradeType::Buy => entry + delta * reward - trade_decay,
        TradeType::Sell => entry - delta * reward - trade_decay,
    }
}

/// Stop-loss exit price.
///
/// BUY: `entry - delta * risk - decay`
/// SELL: `entry + delta * risk - decay`
pub fn exit_stop_loss(
    entry: f64,
    delta: f64,
    risk: f64,
    trade_decay: f64,
    trade_type: TradeType,
) -> f64 {
    match trade_type {
        TradeType::Buy => entry - delta * risk - trade_decay,
        TradeType::Sell => entry + delta * risk - trade_decay,
    }
}

/// Compute all figures for a trade.
///
/// Results are full precision and never clamped: negative exit prices are
/// passed through for the caller to present.
pub fn calculate(inputs: &TradeInputs) -> TradeResults {
    let decay = trade_decay(inputs.theta, inputs.trade_time);

    TradeResults {
        trade_decay: decay,
        exit_take_profit: exit_take_profit(
            inputs.entry,
            inputs.delta,
            inputs.reward,
            decay,
            inputs.trade_type,
        ),
        exit_stop_loss: exit_stop_loss(
            inputs.entry,
            inputs.delta,
            inputs.risk,
            decay,
            inputs.trade_type,
        ),
        risk_amount: inputs.risk,
        reward_amount: inputs.reward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inputs(trade_type: TradeType) -> TradeInputs {
        TradeInputs {
            delta: 0.5,
            theta: -0.05,
            trade_time: 30.0,
            risk: 100.0,
            reward: 200.0,
            entry: 10.0,
            trade_type,
        }
    }

    #[test]
    fn test_buy_option() {
        let results = calculate(&inputs(TradeType::Buy));

        let expected_decay = (-0.05 / (24.0 * 60.0)) * 30.0; // -0.001041667
        assert!((results.trade_decay - expected_decay).abs() < 1e-10);

        // 10 + 100 + 0.001041667
        assert!((results.exit_take_profit - (10.0 + 0.5 * 200.0 - expected_decay)).abs() < 1e-10);
        assert!((results.exit_take_profit - 110.001041667).abs() < 1e-9);

        // 10 - 50 + 0.001041667
        assert!((results.exit_stop_loss - (10.0 - 0.5 * 100.0 - expected_decay)).abs() < 1e-10);
        assert!(results.exit_stop_loss < 0.0);

        assert_eq!(results.risk_amount, 100.0);
        assert_eq!(results.reward_amount, 200.0);
    }

    #[test]
    fn test_sell_option() {
        let results = calculate(&inputs(TradeType::Sell));
        let expected_decay = (-0.05 / (24.0 * 60.0)) * 30.0;

        // 10 - 100 + 0.001041667
        assert!((results.exit_take_profit - (10.0 - 0.5 * 200.0 - expected_decay)).abs() < 1e-10);
        assert!((results.exit_take_profit - -89.998958333).abs() < 1e-9);

        // 10 + 50 + 0.001041667
        assert!((results.exit_stop_loss - (10.0 + 0.5 * 100.0 - expected_decay)).abs() < 1e-10);
    }

    #[test]
    fn test_subtracting_negative_decay_raises_exits() {
        // Negative theta means negative decay, which lifts both exits
        let results = calculate(&inputs(TradeType::Buy));
        assert!(results.trade_decay < 0.0);
        assert!(results.exit_take_profit > 110.0);
        assert!(results.exit_stop_loss > -40.0);
    }

    #[test]
    fn test_zero_theta_has_no_decay() {
        let mut zero = inputs(TradeType::Buy);
        zero.theta = 0.0;
        zero.trade_time = 60.0;
        assert_eq!(calculate(&zero).trade_decay, 0.0);
    }

    #[test]
    fn test_full_day_decay_equals_theta() {
        assert!((trade_decay(-0.1, 1440.0) - -0.1).abs() < 1e-15);
    }

    fn trade_type_strategy() -> impl Strategy<Value = TradeType> {
        prop_oneof![Just(TradeType::Buy), Just(TradeType::Sell)]
    }

    proptest! {
        #[test]
        fn prop_calculate_is_deterministic(
            delta in -1.0f64..1.0,
            theta in -5.0f64..5.0,
            trade_time in 0.0f64..10_000.0,
            risk in 0.01f64..1e6,
            reward in 0.01f64..1e6,
            entry in 0.01f64..1e4,
            trade_type in trade_type_strategy(),
        ) {
            let inputs = TradeInputs { delta, theta, trade_time, risk, reward, entry, trade_type };
            let first = calculate(&inputs);
            let second = calculate(&inputs);
            prop_assert_eq!(first.trade_decay.to_bits(), second.trade_decay.to_bits());
            prop_assert_eq!(first.exit_take_profit.to_bits(), second.exit_take_profit.to_bits());
            prop_assert_eq!(first.exit_stop_loss.to_bits(), second.exit_stop_loss.to_bits());
        }

        #[test]
        fn prop_decay_is_linear_in_time(theta in -5.0f64..5.0, t in 0.0f64..5_000.0) {
            let base = trade_decay(theta, 0.0);
            let single = trade_decay(theta, t) - base;
            let double = trade_decay(theta, 2.0 * t) - base;
            prop_assert!((double - 2.0 * single).abs() <= 1e-12 * (1.0 + double.abs()));
        }

        #[test]
        fn prop_buy_sell_mirror_around_entry_less_decay(
            delta in -1.0f64..1.0,
            theta in -5.0f64..5.0,
            trade_time in 0.0f64..10_000.0,
            risk in 0.01f64..1e4,
            reward in 0.01f64..1e4,
            entry in 0.01f64..1e4,
        ) {
            let buy = calculate(&TradeInputs { delta, theta, trade_time, risk, reward, entry, trade_type: TradeType::Buy });
            let sell = calculate(&TradeInputs { delta, theta, trade_time, risk, reward, entry, trade_type: TradeType::Sell });
            let pivot = 2.0 * (entry - buy.trade_decay);
            let tol = 1e-9 * (1.0 + pivot.abs() + delta.abs() * (risk + reward));

            prop_assert!((buy.exit_take_profit + sell.exit_take_profit - pivot).abs() <= tol);
            prop_assert!((buy.exit_stop_loss + sell.exit_stop_loss - pivot).abs() <= tol);
        }

        #[test]
        fn prop_negating_delta_swaps_trade_type(
            delta in -1.0f64..1.0,
            theta in -5.0f64..5.0,
            trade_time in 0.0f64..10_000.0,
            risk in 0.01f64..1e4,
            reward in 0.01f64..1e4,
            entry in 0.01f64..1e4,
        ) {
            let buy = calculate(&TradeInputs { delta: -delta, theta, trade_time, risk, reward, entry, trade_type: TradeType::Buy });
            let sell = calculate(&TradeInputs { delta, theta, trade_time, risk, reward, entry, trade_type: TradeType::Sell });
            prop_assert_eq!(buy.exit_take_profit.to_bits(), sell.exit_take_profit.to_bits());
            prop_assert_eq!(buy.exit_stop_loss.to_bits(), sell.exit_stop_loss.to_bits());
        }
    }
}

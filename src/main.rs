//! Option Pricing Helper
//!
//! Trade-management figures for options positions: time decay, take-profit
//! and stop-loss exits, risk checks against an account budget, and suggested
//! position size.

mod api;
mod db;
mod error;
mod models;
mod trading;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{round_dp, Dispatcher, DECAY_DP, EXIT_DP, MONEY_DP};
use crate::db::{ConfigStore, Database, MemoryStore};
use crate::models::{AccountConfig, RiskValidation};
use crate::trading::{RiskPolicy, TradeEngine};

/// Options trade calculator CLI.
#[derive(Parser)]
#[command(name = "oph")]
#[command(about = "Decay, exit levels, risk checks and position sizing for options trades", long_about = None)]
struct Cli {
    /// Database URL, or "memory" for a throwaway in-process store
    #[arg(short, long, env = "OPH_DATABASE_URL", default_value = "sqlite:./option_pricing.db?mode=rwc")]
    database: String,

    /// Account whose configuration is used
    #[arg(short, long, env = "OPH_ACCOUNT", default_value = "default")]
    account: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "OPH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

// Numeric arguments stay as strings and go through the same validation as
// JSON requests, so NaN or inf is reported as non-finite rather than dropped.
#[derive(Subcommand)]
enum Commands {
    /// Calculate decay and exit levels for one trade
    Calculate {
        /// Option delta
        #[arg(long, allow_negative_numbers = true)]
        delta: String,

        /// Option theta (per-day decay)
        #[arg(long, allow_negative_numbers = true)]
        theta: String,

        /// Holding period in minutes
        #[arg(long)]
        trade_time: String,

        /// Risk amount
        #[arg(long)]
        risk: String,

        /// Reward amount
        #[arg(long)]
        reward: String,

        /// Entry price
        #[arg(long)]
        entry: String,

        /// buy or sell
        #[arg(long, default_value = "buy")]
        trade_type: String,
    },

    /// Calculate every trade in a JSON file ({"trades": [...]} or a bare array)
    Batch {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Suggest a contract count for a risk budget
    PositionSize {
        /// Amount willing to risk
        #[arg(long, allow_negative_numbers = true)]
        risk_amount: String,

        /// Entry price per option
        #[arg(long)]
        entry_price: String,

        /// Stop loss price per option
        #[arg(long)]
        stop_loss_price: String,
    },

    /// Check a risk amount against the saved account configuration
    ValidateRisk {
        /// Risk amount to check
        #[arg(long, allow_negative_numbers = true)]
        risk_amount: String,
    },

    /// Show or change the account configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Send one JSON request through the dispatcher and print the response
    Request {
        /// Endpoint path, e.g. /calculate
        path: String,

        /// HTTP-style method
        #[arg(short, long, default_value = "POST")]
        method: String,

        /// JSON body; read from stdin when omitted
        #[arg(short, long)]
        body: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the saved configuration
    Show,

    /// Save total capital and/or risk percentage
    Set {
        /// Total trading capital
        #[arg(long)]
        total_capital: Option<String>,

        /// Risk per trade as a percentage of capital (0-100)
        #[arg(long)]
        risk_pct: Option<String>,
    },

    /// Restore factory defaults
    Reset,
}

impl Commands {
    /// JSON request body equivalent to the command's arguments.
    fn request_body(&self) -> Value {
        match self {
            Commands::Calculate {
                delta,
                theta,
                trade_time,
                risk,
                reward,
                entry,
                trade_type,
            } => json!({
                "delta": delta,
                "theta": theta,
                "trade_time": trade_time,
                "risk": risk,
                "reward": reward,
                "entry": entry,
                "trade_type": trade_type,
            }),
            Commands::PositionSize {
                risk_amount,
                entry_price,
                stop_loss_price,
            } => json!({
                "risk_amount": risk_amount,
                "entry_price": entry_price,
                "stop_loss_price": stop_loss_price,
            }),
            Commands::ValidateRisk { risk_amount } => json!({ "risk_amount": risk_amount }),
            Commands::Config {
                action:
                    ConfigAction::Set {
                        total_capital,
                        risk_pct,
                    },
            } => json!({
                "total_capital": total_capital,
                "risk_per_trade_percentage": risk_pct,
            }),
            _ => Value::Null,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Initialize configuration store and engine
    let store: Arc<dyn ConfigStore> = if cli.database == "memory" {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(Database::new(&cli.database).await?)
    };
    let engine = TradeEngine::new(store, cli.account.clone(), RiskPolicy::default());

    let raw = cli.command.request_body();
    match cli.command {
        Commands::Calculate { .. } => {
            let priced = engine.calculate(&raw).await?;
            let results = &priced.results;

            println!("\n=== {} Option ===", priced.inputs.trade_type.as_str().to_uppercase());
            println!("Entry Price:       ${}", priced.inputs.entry);
            println!("Trade Decay:       ${:.6}", round_dp(results.trade_decay, DECAY_DP));
            println!("Exit Take Profit:  ${:.4}", round_dp(results.exit_take_profit, EXIT_DP));
            println!("Exit Stop Loss:    ${:.4}", round_dp(results.exit_stop_loss, EXIT_DP));
            println!("Risk Amount:       ${:.2}", round_dp(results.risk_amount, MONEY_DP));
            println!("Reward Amount:     ${:.2}", round_dp(results.reward_amount, MONEY_DP));

            match &priced.risk_validation {
                Some(validation) => print_validation(validation),
                None => println!("\nNo account configuration saved; risk check skipped."),
            }
        }

        Commands::Batch { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let parsed: Value = serde_json::from_str(&contents)
                .with_context(|| format!("Invalid JSON in {}", file.display()))?;
            let raw = match parsed {
                Value::Array(trades) => json!({ "trades": trades }),
                other => other,
            };

            let items = engine.calculate_batch(&raw).await?;

            println!(
                "\n{:>5} {:<5} {:>12} {:>14} {:>14} {:>9}",
                "INDEX", "TYPE", "DECAY", "TAKE PROFIT", "STOP LOSS", "RISK"
            );
            println!("{}", "-".repeat(64));

            for item in &items {
                match &item.outcome {
                    Ok(priced) => {
                        let severity = priced
                            .risk_validation
                            .as_ref()
                            .map_or("-", |v| v.severity.as_str());
                        println!(
                            "{:>5} {:<5} {:>12.6} {:>14.4} {:>14.4} {:>9}",
                            item.index,
                            priced.inputs.trade_type.as_str(),
                            round_dp(priced.results.trade_decay, DECAY_DP),
                            round_dp(priced.results.exit_take_profit, EXIT_DP),
                            round_dp(priced.results.exit_stop_loss, EXIT_DP),
                            severity
                        );
                    }
                    Err(e) => println!("{:>5} ERROR {}", item.index, e),
                }
            }

            let failed = items.iter().filter(|item| !item.is_ok()).count();
            println!("\nProcessed: {}  Errors: {}", items.len() - failed, failed);
        }

        Commands::PositionSize { .. } => {
            let report = engine.suggest_position(&raw).await?;
            let suggestion = &report.suggestion;

            println!("\n=== Position Size Suggestion ===");
            println!("Suggested Contracts: {}", suggestion.suggested_contracts);
            println!("Risk Per Option:     ${:.2}", suggestion.risk_per_option);
            println!("Actual Risk:         ${:.2}", suggestion.actual_risk);
            println!("Max Allowed Risk:    ${:.2}", suggestion.max_allowed_risk);
            if let Some(capital) = report.total_capital {
                println!("Total Capital:       ${:.2}", capital);
            }
            if let Some(validation) = &report.risk_validation {
                print_validation(validation);
            }
        }

        Commands::ValidateRisk { .. } => {
            let validation = engine.validate_risk(&raw).await?;
            print_validation(&validation);
        }

        Commands::Config { action } => {
            let config = match action {
                ConfigAction::Show => engine.config().await?,
                ConfigAction::Set { .. } => engine.save_config(&raw).await?,
                ConfigAction::Reset => engine.reset_config().await?,
            };
            print_config(engine.account(), &config);
        }

        Commands::Request { path, method, body } => {
            let body = match body {
                Some(body) => body,
                None => std::io::read_to_string(std::io::stdin())
                    .context("Failed to read request body from stdin")?,
            };
            let body: Value = if body.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&body).context("Invalid JSON in request body")?
            };

            info!(method = %method, path = %path, "Dispatching request");
            let dispatcher = Dispatcher::new(engine);
            let response = dispatcher.handle(&method, &path, &body).await;

            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "status": response.status,
                    "body": response.body,
                }))?
            );

            if !response.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_validation(validation: &RiskValidation) {
    println!("\n--- Risk Check ---");
    println!("{}", validation.warning_message);
    println!("Severity:          {}", validation.severity.as_str());
    println!("Valid:             {}", if validation.is_valid { "Yes" } else { "No" });
    println!("Max Allowed Risk:  ${:.2}", validation.max_allowed_risk);
}

fn print_config(account: &str, config: &AccountConfig) {
    println!("\n=== Account Configuration: {} ===\n", account);
    println!("Total Capital:       ${:.2}", config.total_capital);
    println!("Risk Per Trade:      {}%", config.risk_per_trade_percentage);
    println!("Max Risk Per Trade:  ${:.2}", config.max_risk_per_trade());
    println!("Created:             {}", config.created_at.to_rfc3339());
    println!("Updated:             {}", config.updated_at.to_rfc3339());
}

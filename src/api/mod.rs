//! Request/response dispatcher in front of the trade engine.
//!
//! Transport-agnostic: callers hand over a method, a path and a JSON body and
//! get back a status code and a JSON body.

mod types;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::{CoreError, ErrorKind};
use crate::trading::TradeEngine;

pub use types::*;

/// Known endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    Calculate,
    CalculateBatch,
    GetConfig,
    SaveConfig,
    ResetConfig,
    ValidateRisk,
    PositionSize,
}

impl Route {
    pub const ENDPOINTS: [&'static str; 8] = [
        "GET /health - Health check",
        "POST /calculate - Calculate single option trade",
        "POST /calculate-batch - Calculate multiple option trades",
        "GET /config - Current account configuration",
        "POST /config - Save account configuration",
        "POST /config/reset - Reset account configuration to defaults",
        "POST /validate-risk - Check a risk amount against the account",
        "POST /position-size - Suggest contract count",
    ];

    /// Match a method and path. Method is case-insensitive; a trailing slash is ignored.
    pub fn resolve(method: &str, path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        match (method.to_uppercase().as_str(), path) {
            ("GET", "/health") => Some(Self::Health),
            ("POST", "/calculate") => Some(Self::Calculate),
            ("POST", "/calculate-batch") => Some(Self::CalculateBatch),
            ("GET", "/config") => Some(Self::GetConfig),
            ("POST", "/config") => Some(Self::SaveConfig),
            ("POST", "/config/reset") => Some(Self::ResetConfig),
            ("POST", "/validate-risk") => Some(Self::ValidateRisk),
            ("POST", "/position-size") => Some(Self::PositionSize),
            _ => None,
        }
    }
}

/// Status code and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok<T: Serialize>(body: T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => {
                error!(error = %e, "Failed to serialize response");
                Self {
                    status: 500,
                    body: json!({ "error": "Failed to serialize response", "kind": "internal" }),
                }
            }
        }
    }

    fn from_error(err: &CoreError) -> Self {
        let status = match err.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Computation => 422,
            ErrorKind::ConfigurationMissing => 404,
            ErrorKind::Storage => 500,
        };

        if status >= 500 {
            error!(error = %err, "Request failed");
        } else {
            warn!(error = %err, kind = err.kind().as_str(), "Request rejected");
        }

        let body = serde_json::to_value(ErrorResponse::from(err))
            .unwrap_or_else(|_| json!({ "error": err.to_string() }));
        Self { status, body }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            body: json!({
                "error": "Endpoint not found",
                "available_endpoints": Route::ENDPOINTS,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Routes requests to a [`TradeEngine`].
pub struct Dispatcher {
    engine: TradeEngine,
}

impl Dispatcher {
    pub fn new(engine: TradeEngine) -> Self {
        Self { engine }
    }

    /// Handle one request.
    pub async fn handle(&self, method: &str, path: &str, body: &Value) -> ApiResponse {
        match Route::resolve(method, path) {
            Some(route) => self.dispatch(route, body).await,
            None => ApiResponse::not_found(),
        }
    }

    /// Handle a request for an already-resolved route.
    pub async fn dispatch(&self, route: Route, body: &Value) -> ApiResponse {
        let result = match route {
            Route::Health => Ok(ApiResponse::ok(HealthResponse {
                status: "healthy",
                service: "Option Pricing Helper API",
            })),
            Route::Calculate => self
                .engine
                .calculate(body)
                .await
                .map(|priced| ApiResponse::ok(CalculateResponse::from(priced))),
            Route::CalculateBatch => self
                .engine
                .calculate_batch(body)
                .await
                .map(|items| ApiResponse::ok(BatchResponse::from(items))),
            Route::GetConfig => self.engine.config().await.map(|config| {
                ApiResponse::ok(ConfigResponse {
                    success: true,
                    message: None,
                    config: ConfigView::from(&config),
                })
            }),
            Route::SaveConfig => self.engine.save_config(body).await.map(|config| {
                ApiResponse::ok(ConfigResponse {
                    success: true,
                    message: Some("Configuration updated successfully".to_string()),
                    config: ConfigView::from(&config),
                })
            }),
            Route::ResetConfig => self.engine.reset_config().await.map(|config| {
                ApiResponse::ok(ConfigResponse {
                    success: true,
                    message: Some("Configuration reset to defaults".to_string()),
                    config: ConfigView::from(&config),
                })
            }),
            Route::ValidateRisk => self.engine.validate_risk(body).await.map(|validation| {
                ApiResponse::ok(ValidationResponse {
                    success: true,
                    validation,
                })
            }),
            Route::PositionSize => self
                .engine
                .suggest_position(body)
                .await
                .map(|report| ApiResponse::ok(PositionResponse::from(report))),
        };

        result.unwrap_or_else(|e| ApiResponse::from_error(&e))
    }
}

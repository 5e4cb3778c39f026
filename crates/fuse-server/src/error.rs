//! Canonical error envelope.
//!
//! Callers never see a raw provider error shape. The envelope keeps one
//! `{kind, detail}` entry per attempted provider so operators can tell a
//! missing credential from a timeout from an upstream quota rejection.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fuse_core::{AggregatedFailure, GatewayError, ProviderFailure};
use serde::Serialize;
use serde_json::{json, Value};

/// API error returned to the caller
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,
    /// Human-readable message
    pub message: String,
    /// Per-provider diagnostics, when an aggregate failed
    pub providers: Option<Value>,
}

impl ApiError {
    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            providers: None,
        }
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            providers: None,
        }
    }

    /// 502 Bad Gateway
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
            providers: None,
        }
    }

    fn provider_map(failures: &AggregatedFailure) -> Value {
        let mut map = serde_json::Map::new();
        for (provider, failure) in failures.entries() {
            map.insert(
                provider.clone(),
                json!({
                    "kind": failure.kind(),
                    "detail": failure.to_string(),
                }),
            );
        }
        Value::Object(map)
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::InvalidInput { message } => Self::bad_request(message),
            GatewayError::NoProviderConfigured => {
                Self::internal("no provider configured for this gateway")
            }
            GatewayError::AllProvidersFailed(failures) => Self {
                status: StatusCode::BAD_GATEWAY,
                message: "all providers failed".to_string(),
                providers: Some(Self::provider_map(&failures)),
            },
            GatewayError::Internal { message } => Self::internal(message),
        }
    }
}

impl From<ProviderFailure> for ApiError {
    fn from(failure: ProviderFailure) -> Self {
        Self::bad_gateway(failure.to_string())
    }
}

/// Wire shape of the error envelope
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    providers: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            providers: self.providers,
        };
        (self.status, Json(body)).into_response()
    }
}

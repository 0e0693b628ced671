//! The error taxonomy for the cash-flow/performance subsystem.
//!
//! One enum, one `IntoResponse` impl, `json!({ "error": ... })` bodies,
//! carrying whatever field/index/endpoint/key context each variant
//! needs. The configuration-gate rejection special-cases to the exact
//! literal body `{"error": "configuration not correct"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum CashFlowError {
    /// Malformed input: the offending field (or bulk-set index) is named.
    Validation { field: String, message: String },
    /// Missing/blank user-id or Navexa credential at the request boundary.
    Configuration,
    /// Referenced transaction id or account name absent.
    NotFound(String),
    /// Non-2xx, decode failure, ticker mismatch, or cancellation from an upstream provider.
    Upstream { endpoint: String, message: String },
    /// Read/write failure from the underlying user-data store.
    Storage { key: String, message: String },
}

impl CashFlowError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CashFlowError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        CashFlowError::NotFound(what.into())
    }

    pub fn upstream(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        CashFlowError::Upstream {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        CashFlowError::Storage {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CashFlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CashFlowError::Validation { field, message } => {
                write!(f, "validation error on {field}: {message}")
            }
            CashFlowError::Configuration => write!(f, "configuration not correct"),
            CashFlowError::NotFound(what) => write!(f, "not found: {what}"),
            CashFlowError::Upstream { endpoint, message } => {
                write!(f, "upstream error at {endpoint}: {message}")
            }
            CashFlowError::Storage { key, message } => {
                write!(f, "storage error for {key}: {message}")
            }
        }
    }
}

impl std::error::Error for CashFlowError {}

impl IntoResponse for CashFlowError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            CashFlowError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "field": field }),
            ),
            CashFlowError::Configuration => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "configuration not correct" }),
            ),
            CashFlowError::NotFound(what) => {
                (StatusCode::NOT_FOUND, json!({ "error": format!("not found: {what}") }))
            }
            CashFlowError::Upstream { endpoint, message } => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": message, "endpoint": endpoint }),
            ),
            CashFlowError::Storage { key, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message, "key": key }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

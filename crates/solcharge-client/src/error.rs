// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of SolCharge.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use std::error::Error as _;
use std::fmt;
use thiserror::Error;

/// Normalized API failure.
///
/// Every transport, HTTP and decode failure is converted into this shape
/// exactly once, inside the client's request path. `status` is 0 when no
/// HTTP response was received.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("API request failed (status {status}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error,
            timestamp: Utc::now(),
        }
    }

    /// No response was received (DNS, refused connection, timeout)
    pub fn transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connect"
        } else {
            "request"
        };

        // reqwest's top-level message hides the cause, so append the chain
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        Self::new(0, message, Some(kind.to_owned()))
    }

    /// HTTP error response; prefers the `message`/`error` fields of a JSON body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|json| json.get(name))
                .and_then(|value| value.as_str())
                .filter(|text| !text.is_empty())
                .map(str::to_owned)
        };

        let message = field("message")
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        let error = field("error").or_else(|| status.canonical_reason().map(str::to_owned));

        Self::new(status.as_u16(), message, error)
    }

    /// Response arrived but its body could not be read or decoded
    pub fn decode(status: StatusCode, err: impl fmt::Display) -> Self {
        Self::new(
            status.as_u16(),
            format!("Invalid response body: {err}"),
            Some("decode".to_owned()),
        )
    }

    pub fn is_transport(&self) -> bool {
        self.status == 0
    }

    pub fn is_timeout(&self) -> bool {
        self.is_transport() && self.error.as_deref() == Some("timeout")
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Rejected connection configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Timeout must be greater than zero")]
    InvalidTimeout,

    #[error("Invalid value for header {0}")]
    InvalidHeader(&'static str),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_uses_body_message() {
        let err = ApiError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message": "boom", "error": "InverterOffline"}"#,
        );
        assert_eq!(err.status, 500);
        assert_eq!(err.message, "boom");
        assert_eq!(err.error.as_deref(), Some("InverterOffline"));
    }

    #[test]
    fn test_from_response_generic_message() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>proxy error</html>");
        assert_eq!(err.status, 502);
        assert_eq!(err.message, "Request failed with status code 502");
        assert_eq!(err.error.as_deref(), Some("Bad Gateway"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::new(0, "connection refused", None);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], 0);
        assert_eq!(json["message"], "connection refused");
        assert!(json.get("error").is_none());
        assert!(json["timestamp"].is_string());
    }
}

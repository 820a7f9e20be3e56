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

//! Connection configuration for the automation backend.
//!
//! `ConnectionConfig` is an immutable value. Changes are described by a
//! `ConnectionConfigPatch` and applied with [`ConnectionConfig::merge`],
//! which returns a new value; the client swaps whole values, never fields.

use crate::error::ConfigError;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_RETRY_COUNT: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Fixed loopback backend used while simulation mode is on
pub const SIMULATION_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub auth_token: Option<String>,
    pub api_key: Option<String>,
    pub use_https: bool,
    pub simulation_mode: bool,
    /// Extra attempts for idempotent reads after a transport failure
    pub retry_count: u32,
    /// Initial backoff between attempts, doubled after each failure
    pub retry_delay_ms: u64,
}

impl ConnectionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            auth_token: None,
            api_key: None,
            use_https: false,
            simulation_mode: false,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }

    /// Enforce the simulation override and check the invariants the client
    /// relies on: an absolute http(s) URL with a host, a non-zero timeout and
    /// credentials that fit in a header.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.simulation_mode {
            SIMULATION_BASE_URL.clone_into(&mut self.base_url);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        parse_base_url(&self.base_url)?;
        self.default_headers()?;
        Ok(self)
    }

    /// Headers sent with every request. Credentials are marked sensitive.
    pub fn default_headers(&self) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = &self.api_key {
            headers.insert(API_KEY_HEADER, api_key_header(api_key)?);
        }
        if let Some(token) = &self.auth_token {
            headers.insert(AUTHORIZATION, bearer_header(token)?);
        }
        Ok(headers)
    }

    /// Pure merge: fields present in `patch` replace the current ones
    #[must_use]
    pub fn merge(&self, patch: &ConnectionConfigPatch) -> Self {
        Self {
            base_url: patch
                .base_url
                .clone()
                .unwrap_or_else(|| self.base_url.clone()),
            timeout_ms: patch.timeout_ms.unwrap_or(self.timeout_ms),
            auth_token: patch
                .auth_token
                .clone()
                .unwrap_or_else(|| self.auth_token.clone()),
            api_key: patch.api_key.clone().unwrap_or_else(|| self.api_key.clone()),
            use_https: patch.use_https.unwrap_or(self.use_https),
            simulation_mode: patch.simulation_mode.unwrap_or(self.simulation_mode),
            retry_count: patch.retry_count.unwrap_or(self.retry_count),
            retry_delay_ms: patch.retry_delay_ms.unwrap_or(self.retry_delay_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

// Credentials stay out of logs
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("use_https", &self.use_https)
            .field("simulation_mode", &self.simulation_mode)
            .field("retry_count", &self.retry_count)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

/// Partial update of a [`ConnectionConfig`].
///
/// `auth_token`/`api_key` are doubly optional: `Some(None)` clears the
/// credential, `None` leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfigPatch {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub auth_token: Option<Option<String>>,
    pub api_key: Option<Option<String>>,
    pub use_https: Option<bool>,
    pub simulation_mode: Option<bool>,
    pub retry_count: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

impl ConnectionConfigPatch {
    pub fn base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: Some(url.into()),
            ..Default::default()
        }
    }
}

fn sensitive_header(name: &'static str, value: &str) -> Result<HeaderValue, ConfigError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader(name))?;
    value.set_sensitive(true);
    Ok(value)
}

/// `x-api-key` value for `api_key`
pub fn api_key_header(api_key: &str) -> Result<HeaderValue, ConfigError> {
    sensitive_header(API_KEY_HEADER, api_key)
}

/// `Authorization: Bearer` value for `token`
pub fn bearer_header(token: &str) -> Result<HeaderValue, ConfigError> {
    sensitive_header("authorization", &format!("Bearer {token}"))
}

/// Parse and check a backend base URL
pub fn parse_base_url(url: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: url.to_owned(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_owned()));
    }
    Ok(parsed)
}

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

//! The persisted application settings record.

use crate::defaults::EnvDefaults;
use serde::{Deserialize, Serialize};
use solcharge_client::{
    ConnectionConfig, SIMULATION_BASE_URL, api_key_header, bearer_header, parse_base_url,
};
use std::fmt;
use tracing::warn;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

// ============= Display preferences =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Watts,
    #[default]
    Kilowatts,
}

impl Units {
    /// Format a power reading given in watts
    pub fn format_power(self, watts: f64) -> String {
        match self {
            Self::Watts => format!("{watts:.0} W"),
            Self::Kilowatts => format!("{:.2} kW", watts / 1000.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Da,
}

macro_rules! lowercase_display {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&format!("{self:?}").to_lowercase())
            }
        })*
    };
}

lowercase_display!(Theme, Units, Language);

// ============= Settings record =============

/// Connection configuration plus display preferences.
///
/// `base_url` is derived and never set directly: simulation mode wins, then
/// the user override, then the environment default.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub base_url: String,
    #[serde(default)]
    pub custom_base_url: Option<String>,
    pub timeout_ms: u64,
    pub retry_count: u32,
    pub retry_delay_ms: u64,
    pub use_https: bool,
    pub simulation_mode: bool,
    /// Always written; `null` marks a cleared key and wins over the
    /// environment default on load
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    pub refresh_interval_secs: u64,
    pub theme: Theme,
    pub notifications_enabled: bool,
    pub units: Units,
    pub language: Language,
}

impl AppSettings {
    pub fn defaults(env: &EnvDefaults) -> Self {
        Self {
            base_url: env.base_url.clone(),
            custom_base_url: None,
            timeout_ms: env.timeout_ms,
            retry_count: env.retry_count,
            retry_delay_ms: env.retry_delay_ms,
            use_https: env.use_https,
            simulation_mode: env.simulation_mode,
            api_key: env.api_key.clone(),
            auth_token: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            theme: Theme::default(),
            notifications_enabled: true,
            units: Units::default(),
            language: Language::default(),
        }
        .derive_base_url(&env.base_url)
    }

    /// Recompute `base_url` from the simulation flag and the override
    #[must_use]
    pub fn derive_base_url(mut self, default_base_url: &str) -> Self {
        self.base_url = if self.simulation_mode {
            SIMULATION_BASE_URL.to_owned()
        } else {
            self.custom_base_url
                .clone()
                .unwrap_or_else(|| default_base_url.to_owned())
        };
        self
    }

    /// Decode a stored record, filling fields it lacks from `defaults`.
    ///
    /// Values that would break the client (an unparseable override, a zero
    /// timeout) are replaced by their defaults. Credentials that cannot be
    /// sent as a header are dropped.
    pub fn from_stored(json: &str, defaults: &Self) -> Result<Self, serde_json::Error> {
        let stored: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(stored) = stored else {
            return Err(serde::de::Error::custom("settings record is not a JSON object"));
        };

        let mut merged = serde_json::to_value(defaults)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(stored);
        }
        let mut settings: Self = serde_json::from_value(merged)?;

        if let Some(url) = &settings.custom_base_url
            && let Err(e) = parse_base_url(url)
        {
            warn!("Dropping stored backend URL override: {}", e);
            settings.custom_base_url = None;
        }
        if settings.timeout_ms == 0 {
            warn!("Stored timeout is zero, using {} ms", defaults.timeout_ms);
            settings.timeout_ms = defaults.timeout_ms;
        }
        if let Some(key) = &settings.api_key
            && let Err(e) = api_key_header(key)
        {
            warn!("Dropping stored API key: {}", e);
            settings.api_key = None;
        }
        if let Some(token) = &settings.auth_token
            && let Err(e) = bearer_header(token)
        {
            warn!("Dropping stored auth token: {}", e);
            settings.auth_token = None;
        }

        Ok(settings)
    }

    /// Pure merge: fields present in `patch` replace the current ones.
    /// `base_url` is left for the caller to re-derive.
    #[must_use]
    pub fn merge(&self, patch: &AppSettingsPatch) -> Self {
        let pick_opt = |field: &Option<Option<String>>, current: &Option<String>| {
            field.clone().unwrap_or_else(|| current.clone())
        };

        Self {
            base_url: self.base_url.clone(),
            custom_base_url: pick_opt(&patch.custom_base_url, &self.custom_base_url),
            timeout_ms: patch.timeout_ms.unwrap_or(self.timeout_ms),
            retry_count: patch.retry_count.unwrap_or(self.retry_count),
            retry_delay_ms: patch.retry_delay_ms.unwrap_or(self.retry_delay_ms),
            use_https: patch.use_https.unwrap_or(self.use_https),
            simulation_mode: patch.simulation_mode.unwrap_or(self.simulation_mode),
            api_key: pick_opt(&patch.api_key, &self.api_key),
            auth_token: pick_opt(&patch.auth_token, &self.auth_token),
            refresh_interval_secs: patch
                .refresh_interval_secs
                .unwrap_or(self.refresh_interval_secs),
            theme: patch.theme.unwrap_or(self.theme),
            notifications_enabled: patch
                .notifications_enabled
                .unwrap_or(self.notifications_enabled),
            units: patch.units.unwrap_or(self.units),
            language: patch.language.unwrap_or(self.language),
        }
    }

    /// The connection subset handed to the API client
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
            auth_token: self.auth_token.clone(),
            api_key: self.api_key.clone(),
            use_https: self.use_https,
            simulation_mode: self.simulation_mode,
            retry_count: self.retry_count,
            retry_delay_ms: self.retry_delay_ms,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::defaults(&EnvDefaults::default())
    }
}

// Credentials stay out of logs
impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("base_url", &self.base_url)
            .field("custom_base_url", &self.custom_base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("retry_count", &self.retry_count)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("use_https", &self.use_https)
            .field("simulation_mode", &self.simulation_mode)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("theme", &self.theme)
            .field("notifications_enabled", &self.notifications_enabled)
            .field("units", &self.units)
            .field("language", &self.language)
            .finish()
    }
}

/// Partial update of [`AppSettings`].
///
/// Doubly optional fields: `Some(None)` clears the value, `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettingsPatch {
    pub custom_base_url: Option<Option<String>>,
    pub timeout_ms: Option<u64>,
    pub retry_count: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub use_https: Option<bool>,
    pub simulation_mode: Option<bool>,
    pub api_key: Option<Option<String>>,
    pub auth_token: Option<Option<String>>,
    pub refresh_interval_secs: Option<u64>,
    pub theme: Option<Theme>,
    pub notifications_enabled: Option<bool>,
    pub units: Option<Units>,
    pub language: Option<Language>,
}

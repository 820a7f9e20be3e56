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

//! Connection defaults taken from the process environment

use solcharge_client::{
    DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS, parse_base_url,
};
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://192.168.1.50:3000";

pub const ENV_BASE_URL: &str = "API_BASE_URL";
pub const ENV_TIMEOUT: &str = "API_TIMEOUT";
pub const ENV_RETRY_COUNT: &str = "API_RETRY_COUNT";
pub const ENV_RETRY_DELAY: &str = "API_RETRY_DELAY";
pub const ENV_USE_HTTPS: &str = "API_USE_HTTPS";
pub const ENV_SIMULATION_MODE: &str = "SIMULATION_MODE";
pub const ENV_API_KEY: &str = "API_KEY";

/// Defaults the settings store falls back to and resets to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvDefaults {
    pub base_url: String,
    pub timeout_ms: u64,
    pub retry_count: u32,
    pub retry_delay_ms: u64,
    pub use_https: bool,
    pub simulation_mode: bool,
    pub api_key: Option<String>,
}

impl Default for EnvDefaults {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            use_https: false,
            simulation_mode: false,
            api_key: None,
        }
    }
}

impl EnvDefaults {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build defaults from an arbitrary variable lookup.
    ///
    /// Empty values count as unset. Malformed values are logged and replaced
    /// by the built-in default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let mut defaults = Self::default();

        if let Some(url) = var(ENV_BASE_URL) {
            match parse_base_url(&url) {
                Ok(_) => defaults.base_url = url,
                Err(e) => warn!("Ignoring {}: {}", ENV_BASE_URL, e),
            }
        }

        if let Some(timeout) = parse_var::<u64>(ENV_TIMEOUT, var(ENV_TIMEOUT)) {
            if timeout > 0 {
                defaults.timeout_ms = timeout;
            } else {
                warn!("Ignoring {}: timeout must be greater than zero", ENV_TIMEOUT);
            }
        }
        if let Some(count) = parse_var(ENV_RETRY_COUNT, var(ENV_RETRY_COUNT)) {
            defaults.retry_count = count;
        }
        if let Some(delay) = parse_var(ENV_RETRY_DELAY, var(ENV_RETRY_DELAY)) {
            defaults.retry_delay_ms = delay;
        }
        if let Some(enabled) = var(ENV_USE_HTTPS).and_then(|v| parse_flag(ENV_USE_HTTPS, &v)) {
            defaults.use_https = enabled;
        }
        if let Some(enabled) =
            var(ENV_SIMULATION_MODE).and_then(|v| parse_flag(ENV_SIMULATION_MODE, &v))
        {
            defaults.simulation_mode = enabled;
        }
        defaults.api_key = var(ENV_API_KEY);

        defaults
    }
}

fn parse_var<T: FromStr>(name: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring {}: '{}' is not a valid number", name, value);
            None
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => {
            warn!("Ignoring {}: '{}' is not a boolean", name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_builtin_defaults() {
        let defaults = EnvDefaults::from_lookup(lookup(&[]));
        assert_eq!(defaults, EnvDefaults::default());
        assert_eq!(defaults.base_url, DEFAULT_BASE_URL);
        assert_eq!(defaults.timeout_ms, 10_000);
        assert!(defaults.api_key.is_none());
    }

    #[test]
    fn test_reads_all_variables() {
        let defaults = EnvDefaults::from_lookup(lookup(&[
            ("API_BASE_URL", "http://10.0.0.20:8080"),
            ("API_TIMEOUT", "2500"),
            ("API_RETRY_COUNT", "4"),
            ("API_RETRY_DELAY", "250"),
            ("API_USE_HTTPS", "true"),
            ("SIMULATION_MODE", "1"),
            ("API_KEY", "abc123"),
        ]));

        assert_eq!(defaults.base_url, "http://10.0.0.20:8080");
        assert_eq!(defaults.timeout_ms, 2500);
        assert_eq!(defaults.retry_count, 4);
        assert_eq!(defaults.retry_delay_ms, 250);
        assert!(defaults.use_https);
        assert!(defaults.simulation_mode);
        assert_eq!(defaults.api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_ignores_malformed_values() {
        let defaults = EnvDefaults::from_lookup(lookup(&[
            ("API_BASE_URL", "192.168.1.9"),
            ("API_TIMEOUT", "0"),
            ("API_RETRY_COUNT", "-1"),
            ("API_RETRY_DELAY", "soon"),
            ("API_USE_HTTPS", "maybe"),
            ("API_KEY", "   "),
        ]));

        assert_eq!(defaults, EnvDefaults::default());
    }
}

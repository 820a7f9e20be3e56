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

//! HTTP client for the SolCharge automation backend.
//!
//! Provides typed access to Solis inverter telemetry, Zaptec charger status,
//! automation configuration and chart data. Every failure is reported as a
//! single normalized [`ApiError`].

pub mod adopter;
pub mod charts;
pub mod client;
pub mod config;
pub mod error;

pub use adopter::SnapshotAdopter;
pub use charts::{ChartPoint, ChartSeries, reshape_in};
pub use client::{ApiClient, HEALTH_CHECK_TIMEOUT};
pub use config::{
    API_KEY_HEADER, ConnectionConfig, ConnectionConfigPatch, DEFAULT_RETRY_COUNT,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS, SIMULATION_BASE_URL, api_key_header,
    bearer_header, parse_base_url,
};
pub use error::{ApiError, ApiResult, ConfigError};
pub use reqwest::Url;

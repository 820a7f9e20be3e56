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

//! Error types for the settings crate

use solcharge_client::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid IP address '{0}': expected a dotted-quad IPv4 address or 'localhost'")]
    InvalidIp(String),

    #[error("invalid port {0}: must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("invalid connection settings: {0}")]
    InvalidConnection(#[from] ConfigError),

    #[error("settings storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

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

//! Persistent settings for SolCharge.
//!
//! Holds the backend connection parameters and display preferences, seeded
//! from environment defaults and persisted as a single JSON record.

pub mod address;
pub mod defaults;
pub mod error;
pub mod settings;
pub mod storage;
pub mod store;

pub use address::{BackendAddress, compose_backend_url, parse_backend_url};
pub use defaults::{DEFAULT_BASE_URL, EnvDefaults};
pub use error::{SettingsError, SettingsResult};
pub use settings::{AppSettings, AppSettingsPatch, Language, Theme, Units};
pub use storage::{DEFAULT_DATA_DIR, FileStore, KeyValueStore, MemoryStore};
pub use store::{SETTINGS_KEY, SettingsStore};

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

//! Settings store: cached [`AppSettings`] backed by a [`KeyValueStore`].
//!
//! The whole record is read at startup and rewritten on every change. The
//! cache only changes after a successful write, and writes are serialized
//! so read-modify-write cycles never interleave.

use crate::address::{compose_backend_url, validate_ip, validate_port};
use crate::defaults::EnvDefaults;
use crate::error::SettingsResult;
use crate::settings::{AppSettings, AppSettingsPatch};
use crate::storage::KeyValueStore;
use parking_lot::RwLock;
use solcharge_client::{ConnectionConfig, ConnectionConfigPatch, parse_base_url};
use std::fmt;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Storage key of the settings record
pub const SETTINGS_KEY: &str = "app_settings";

pub struct SettingsStore {
    storage: Box<dyn KeyValueStore>,
    env: EnvDefaults,
    cache: RwLock<AppSettings>,
    write_lock: Mutex<()>,
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("default_base_url", &self.env.base_url)
            .field("cache", &*self.cache.read())
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    /// The cache starts at the defaults until [`SettingsStore::load_settings`] runs
    pub fn new(storage: impl KeyValueStore + 'static, env: EnvDefaults) -> Self {
        Self {
            storage: Box::new(storage),
            cache: RwLock::new(AppSettings::defaults(&env)),
            env,
            write_lock: Mutex::new(()),
        }
    }

    pub fn env_defaults(&self) -> &EnvDefaults {
        &self.env
    }

    pub fn defaults(&self) -> AppSettings {
        AppSettings::defaults(&self.env)
    }

    /// Copy of the cached settings
    pub fn settings(&self) -> AppSettings {
        self.cache.read().clone()
    }

    /// Read the stored record, merged over the defaults.
    ///
    /// Never fails: a missing, unreadable or corrupt record yields the
    /// defaults.
    pub async fn load_settings(&self) -> AppSettings {
        let defaults = self.defaults();

        let settings = match self.storage.get(SETTINGS_KEY).await {
            Ok(Some(json)) => match AppSettings::from_stored(&json, &defaults) {
                Ok(stored) => {
                    info!("Loaded settings (backend {})", stored.base_url);
                    stored
                }
                Err(e) => {
                    warn!("Stored settings are corrupt, using defaults: {}", e);
                    defaults
                }
            },
            Ok(None) => {
                info!("No stored settings found, using defaults");
                defaults
            }
            Err(e) => {
                warn!("Failed to read stored settings, using defaults: {}", e);
                defaults
            }
        };

        let settings = settings.derive_base_url(&self.env.base_url);
        *self.cache.write() = settings.clone();
        settings
    }

    /// Merge `patch` into the current settings and persist the full record
    pub async fn save_settings(&self, patch: &AppSettingsPatch) -> SettingsResult<AppSettings> {
        self.update(|_| Ok(patch.clone())).await
    }

    /// Serialized read-modify-write. The patch is computed from the settings
    /// as they are once the write lock is held, and a result the client
    /// would refuse is rejected before anything is written.
    async fn update<F>(&self, make_patch: F) -> SettingsResult<AppSettings>
    where
        F: FnOnce(&AppSettings) -> SettingsResult<AppSettingsPatch>,
    {
        let _guard = self.write_lock.lock().await;

        let current = self.settings();
        let patch = make_patch(&current)?;
        let next = current.merge(&patch).derive_base_url(&self.env.base_url);
        next.connection_config().validated()?;

        let json = serde_json::to_string_pretty(&next)?;
        self.storage.set(SETTINGS_KEY, &json).await?;

        *self.cache.write() = next.clone();
        info!(
            "Saved settings (backend {}, simulation={})",
            next.base_url, next.simulation_mode
        );
        Ok(next)
    }

    pub fn get_api_config(&self) -> ConnectionConfig {
        self.cache.read().connection_config()
    }

    /// Persist a change to the connection subset.
    ///
    /// A new `base_url` is stored as the user override. The merged
    /// configuration is validated before it is written.
    pub async fn update_api_config(
        &self,
        patch: &ConnectionConfigPatch,
    ) -> SettingsResult<ConnectionConfig> {
        if let Some(url) = &patch.base_url {
            parse_base_url(url)?;
        }

        let settings_patch = AppSettingsPatch {
            custom_base_url: patch.base_url.clone().map(Some),
            timeout_ms: patch.timeout_ms,
            retry_count: patch.retry_count,
            retry_delay_ms: patch.retry_delay_ms,
            use_https: patch.use_https,
            simulation_mode: patch.simulation_mode,
            api_key: patch.api_key.clone(),
            auth_token: patch.auth_token.clone(),
            ..Default::default()
        };

        Ok(self.save_settings(&settings_patch).await?.connection_config())
    }

    /// Point the client at `<scheme>://<ip>:<port>`, scheme following `use_https`.
    ///
    /// Input is validated before any storage access.
    pub async fn set_custom_backend_url(&self, ip: &str, port: u16) -> SettingsResult<AppSettings> {
        validate_ip(ip)?;
        validate_port(port)?;

        self.update(|current| {
            let url = compose_backend_url(ip, port, current.use_https);
            parse_base_url(&url)?;
            Ok(AppSettingsPatch {
                custom_base_url: Some(Some(url)),
                ..Default::default()
            })
        })
        .await
    }

    pub async fn reset_to_default_url(&self) -> SettingsResult<AppSettings> {
        self.save_settings(&AppSettingsPatch {
            custom_base_url: Some(None),
            ..Default::default()
        })
        .await
    }

    pub async fn reset_to_default_api_key(&self) -> SettingsResult<AppSettings> {
        self.save_settings(&AppSettingsPatch {
            api_key: Some(self.env.api_key.clone()),
            ..Default::default()
        })
        .await
    }

    /// Flip simulation mode; `base_url` follows the derivation rule
    pub async fn toggle_simulation_mode(&self) -> SettingsResult<AppSettings> {
        self.update(|current| {
            Ok(AppSettingsPatch {
                simulation_mode: Some(!current.simulation_mode),
                ..Default::default()
            })
        })
        .await
    }

    /// Delete the stored record and reset the cache to the defaults
    pub async fn reset_all_settings(&self) -> SettingsResult<AppSettings> {
        let _guard = self.write_lock.lock().await;

        self.storage.remove(SETTINGS_KEY).await?;

        let defaults = self.defaults();
        *self.cache.write() = defaults.clone();
        info!("All settings reset to defaults");
        Ok(defaults)
    }
}

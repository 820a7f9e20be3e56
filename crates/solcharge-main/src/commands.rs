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

//! Command handlers.
//!
//! [`App`] owns the single settings store and API client of the process.
//! Handlers that change connection settings write through the store and then
//! push the resulting configuration into the client.

use crate::cli::{AutomationCommand, ChartArgs, Cli, Commands, SettingsCommand};
use crate::formatters::TableFormatter;
use anyhow::{Context, Result, bail};
use solcharge_client::{ApiClient, ConnectionConfigPatch, SnapshotAdopter};
use solcharge_settings::{EnvDefaults, FileStore, MemoryStore, SettingsStore};
use solcharge_types::{Acknowledgement, ChargerStatus, InverterSnapshot, PriorityLoadReserve};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct App {
    store: Arc<SettingsStore>,
    client: Arc<ApiClient>,
}

impl App {
    pub fn new(store: Arc<SettingsStore>, client: Arc<ApiClient>) -> Self {
        Self { store, client }
    }

    /// Build the store and the client from the environment and stored settings
    pub async fn bootstrap(cli: &Cli) -> Result<Self> {
        let env = EnvDefaults::from_env();

        let store = if cli.memory {
            info!("Using in-memory settings");
            SettingsStore::new(MemoryStore::new(), env)
        } else {
            info!("Using settings from {}", cli.data_dir.display());
            SettingsStore::new(FileStore::new(&cli.data_dir), env)
        };
        let settings = store.load_settings().await;

        let client = ApiClient::new(settings.connection_config())
            .context("Stored connection settings are invalid")?;

        Ok(Self::new(Arc::new(store), Arc::new(client)))
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Status => self.status().await,
            Commands::Watch { interval } => self.watch(interval).await,
            Commands::Health => self.health().await,
            Commands::Automation { action } => self.automation(action).await,
            Commands::Chart(args) => self.chart(args).await,
            Commands::Settings { action } => self.settings(action).await,
        }
    }

    async fn fetch_snapshots(&self) -> Result<(InverterSnapshot, ChargerStatus)> {
        let snapshots = tokio::try_join!(
            self.client.get_latest_inverter_data(),
            self.client.get_charger_status()
        )?;
        Ok(snapshots)
    }

    async fn status(&self) -> Result<()> {
        let (inverter, charger) = self
            .fetch_snapshots()
            .await
            .context("Failed to fetch status")?;
        let units = self.store.settings().units;

        println!("{}", TableFormatter::format_status(&inverter, &charger, units));
        Ok(())
    }

    /// Poll until Ctrl-C. A failed tick keeps the last snapshot on screen.
    async fn watch(&self, interval: Option<u64>) -> Result<()> {
        let settings = self.store.settings();
        let secs = interval.unwrap_or(settings.refresh_interval_secs).max(1);
        info!("Polling every {}s, press Ctrl-C to stop", secs);

        let mut ticker = tokio::time::interval(Duration::from_secs(secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut inverter_adopter = SnapshotAdopter::new();
        let mut charger_adopter = SnapshotAdopter::new();

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = &mut shutdown => {
                    if let Err(e) = result {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                    }
                    info!("Stopping watch");
                    break;
                }
                _ = ticker.tick() => {
                    if self.poll_once(&mut inverter_adopter, &mut charger_adopter).await
                        && let (Some(inverter), Some(charger)) =
                            (inverter_adopter.current(), charger_adopter.current())
                    {
                        println!("{}", TableFormatter::format_status(inverter, charger, settings.units));
                    }
                }
            }
        }

        Ok(())
    }

    /// One watch tick. Returns `true` when either snapshot moved forward;
    /// a failed fetch leaves both adopters untouched.
    async fn poll_once(
        &self,
        inverter_adopter: &mut SnapshotAdopter<InverterSnapshot>,
        charger_adopter: &mut SnapshotAdopter<ChargerStatus>,
    ) -> bool {
        match self.fetch_snapshots().await {
            Ok((inverter, charger)) => {
                let fresh_inverter = inverter_adopter.offer(inverter);
                let fresh_charger = charger_adopter.offer(charger);
                if !(fresh_inverter || fresh_charger) {
                    debug!("No newer data since last poll");
                }
                fresh_inverter || fresh_charger
            }
            Err(e) => {
                warn!("Poll failed, keeping previous data: {:#}", e);
                false
            }
        }
    }

    async fn health(&self) -> Result<()> {
        let base_url = self.client.config().base_url;
        if self.client.test_connection().await {
            println!("✅ Backend at {base_url} is reachable");
            Ok(())
        } else {
            bail!("Backend at {base_url} is not reachable")
        }
    }

    async fn automation(&self, action: AutomationCommand) -> Result<()> {
        let ack = match action {
            AutomationCommand::Show => {
                let config = self
                    .client
                    .get_automation_config()
                    .await
                    .context("Failed to fetch automation config")?;
                println!("{}", TableFormatter::format_automation(&config));
                return Ok(());
            }
            AutomationCommand::Enable => self.client.enable_automation().await?,
            AutomationCommand::Disable => self.client.disable_automation().await?,
            AutomationCommand::Mode { mode } => self.client.set_automation_mode(mode).await?,
            AutomationCommand::Reserve { watts } => {
                let reserve = PriorityLoadReserve::try_from(watts)?;
                self.client.set_priority_load_reserve(reserve).await?
            }
            AutomationCommand::NeverStop { enabled } => {
                self.client.set_never_stop_charging(enabled).await?
            }
        };

        report(&ack)
    }

    async fn chart(&self, args: ChartArgs) -> Result<()> {
        let series = self
            .client
            .get_chart_series(args.kind, args.period, args.date)
            .await
            .with_context(|| format!("Failed to fetch {} chart", args.kind))?;

        println!("{}", TableFormatter::format_chart(&series));
        Ok(())
    }

    async fn settings(&self, action: SettingsCommand) -> Result<()> {
        let settings = match action {
            SettingsCommand::Show => {
                println!(
                    "{}",
                    TableFormatter::format_settings(&self.store.settings(), &self.client.config())
                );
                return Ok(());
            }
            SettingsCommand::SetBackend { ip, port } => {
                self.store.set_custom_backend_url(&ip, port).await?
            }
            SettingsCommand::ResetUrl => self.store.reset_to_default_url().await?,
            SettingsCommand::ResetApiKey => self.store.reset_to_default_api_key().await?,
            SettingsCommand::ToggleSimulation => self.store.toggle_simulation_mode().await?,
            SettingsCommand::SetToken { token } => {
                self.set_token(Some(token)).await?;
                self.store.settings()
            }
            SettingsCommand::ClearToken => {
                self.set_token(None).await?;
                self.store.settings()
            }
            SettingsCommand::Reset => self.store.reset_all_settings().await?,
        };

        self.apply_connection()?;
        println!(
            "Settings saved. Backend: {} (simulation {})",
            settings.base_url,
            if settings.simulation_mode { "on" } else { "off" }
        );
        Ok(())
    }

    async fn set_token(&self, token: Option<String>) -> Result<()> {
        self.store
            .update_api_config(&ConnectionConfigPatch {
                auth_token: Some(token),
                ..Default::default()
            })
            .await?;
        Ok(())
    }

    /// Hand the stored connection settings to the live client
    fn apply_connection(&self) -> Result<()> {
        self.client
            .update_config(self.store.get_api_config())
            .context("Failed to apply new connection settings")
    }
}

fn report(ack: &Acknowledgement) -> Result<()> {
    if !ack.success {
        bail!("Backend rejected the change: {}", ack.message);
    }
    if ack.message.is_empty() {
        println!("✅ Done");
    } else {
        println!("✅ {}", ack.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use solcharge_settings::SettingsError;
    use solcharge_types::ValidationError;

    async fn app_for(server_url: String) -> App {
        let env = EnvDefaults {
            base_url: server_url,
            retry_count: 0,
            ..EnvDefaults::default()
        };
        let store = SettingsStore::new(MemoryStore::new(), env);
        let settings = store.load_settings().await;
        let client = ApiClient::new(settings.connection_config()).unwrap();
        App::new(Arc::new(store), Arc::new(client))
    }

    #[tokio::test]
    async fn test_status_fetches_both_snapshots() {
        let mut server = Server::new_async().await;
        let inverter = server
            .mock("GET", "/automation/solis/latest")
            .with_status(200)
            .with_body(json!({"timestamp": "2025-06-01T12:00:00Z"}).to_string())
            .create_async()
            .await;
        let charger = server
            .mock("GET", "/automation/zaptec/status")
            .with_status(200)
            .with_body(json!({"timestamp": "2025-06-01T12:00:00Z"}).to_string())
            .create_async()
            .await;

        let app = app_for(server.url()).await;
        app.run(Commands::Status).await.unwrap();

        inverter.assert_async().await;
        charger.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_fails_when_one_read_fails() {
        let mut server = Server::new_async().await;
        let _inverter = server
            .mock("GET", "/automation/solis/latest")
            .with_status(200)
            .with_body(json!({"timestamp": "2025-06-01T12:00:00Z"}).to_string())
            .create_async()
            .await;
        let _charger = server
            .mock("GET", "/automation/zaptec/status")
            .with_status(503)
            .create_async()
            .await;

        let app = app_for(server.url()).await;
        assert!(app.run(Commands::Status).await.is_err());
    }

    #[tokio::test]
    async fn test_negative_reserve_is_rejected_before_sending() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/automation/config")
            .expect(0)
            .create_async()
            .await;

        let app = app_for(server.url()).await;
        let err = app
            .run(Commands::Automation {
                action: AutomationCommand::Reserve { watts: -100 },
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::ReserveOutOfRange { value: -100, .. })
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_acknowledgement_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/automation/config")
            .match_body(Matcher::Json(json!({"neverStopCharging": true})))
            .with_status(200)
            .with_body(json!({"success": false, "message": "Charger offline", "timestamp": "t"}).to_string())
            .create_async()
            .await;

        let app = app_for(server.url()).await;
        let err = app
            .run(Commands::Automation {
                action: AutomationCommand::NeverStop { enabled: true },
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Charger offline"));
    }

    #[tokio::test]
    async fn test_set_backend_reconfigures_client() {
        let app = app_for("http://192.168.1.50:3000".to_owned()).await;

        app.run(Commands::Settings {
            action: SettingsCommand::SetBackend {
                ip: "10.0.0.7".to_owned(),
                port: 8080,
            },
        })
        .await
        .unwrap();
        assert_eq!(app.client.config().base_url, "http://10.0.0.7:8080");

        app.run(Commands::Settings {
            action: SettingsCommand::ToggleSimulation,
        })
        .await
        .unwrap();
        assert_eq!(app.client.config().base_url, "http://127.0.0.1:3000");
    }

    #[tokio::test]
    async fn test_invalid_backend_leaves_client_alone() {
        let app = app_for("http://192.168.1.50:3000".to_owned()).await;

        let err = app
            .run(Commands::Settings {
                action: SettingsCommand::SetBackend {
                    ip: "backend.local".to_owned(),
                    port: 8080,
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SettingsError>(),
            Some(SettingsError::InvalidIp(_))
        ));
        assert_eq!(app.client.config().base_url, "http://192.168.1.50:3000");
    }

    #[tokio::test]
    async fn test_token_commands_update_client() {
        let app = app_for("http://192.168.1.50:3000".to_owned()).await;

        app.run(Commands::Settings {
            action: SettingsCommand::SetToken {
                token: "abc".to_owned(),
            },
        })
        .await
        .unwrap();
        assert_eq!(app.client.config().auth_token.as_deref(), Some("abc"));

        app.run(Commands::Settings {
            action: SettingsCommand::ClearToken,
        })
        .await
        .unwrap();
        assert!(app.client.config().auth_token.is_none());
    }

    #[tokio::test]
    async fn test_token_unfit_for_header_is_refused() {
        let app = app_for("http://192.168.1.50:3000".to_owned()).await;

        let err = app
            .run(Commands::Settings {
                action: SettingsCommand::SetToken {
                    token: "abc\ndef".to_owned(),
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SettingsError>(),
            Some(SettingsError::InvalidConnection(_))
        ));
        assert!(app.store.settings().auth_token.is_none());
        assert!(app.client.config().auth_token.is_none());

        // Later settings commands still work
        app.run(Commands::Settings {
            action: SettingsCommand::ClearToken,
        })
        .await
        .unwrap();
    }

    fn inverter_at(timestamp: &str, soc: f64) -> String {
        json!({"timestamp": timestamp, "battery": {"soc": soc}}).to_string()
    }

    #[tokio::test]
    async fn test_poll_once_adopts_only_newer_data() {
        let mut server = Server::new_async().await;
        let _first = server
            .mock("GET", "/automation/solis/latest")
            .with_status(200)
            .with_body(inverter_at("2025-06-01T12:00:00Z", 40.0))
            .expect(2)
            .create_async()
            .await;
        let _failure = server
            .mock("GET", "/automation/solis/latest")
            .with_status(500)
            .with_body(json!({"message": "inverter offline"}).to_string())
            .expect(1)
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/automation/solis/latest")
            .with_status(200)
            .with_body(inverter_at("2025-06-01T12:00:30Z", 41.0))
            .create_async()
            .await;
        let _charger = server
            .mock("GET", "/automation/zaptec/status")
            .with_status(200)
            .with_body(json!({"timestamp": "2025-06-01T12:00:00Z", "online": true}).to_string())
            .create_async()
            .await;

        let app = app_for(server.url()).await;
        let mut inverter_adopter = SnapshotAdopter::new();
        let mut charger_adopter = SnapshotAdopter::new();

        // First tick shows data
        assert!(app.poll_once(&mut inverter_adopter, &mut charger_adopter).await);

        // Same timestamps again: nothing to redraw
        assert!(!app.poll_once(&mut inverter_adopter, &mut charger_adopter).await);
        assert_eq!(inverter_adopter.rejected_count(), 1);

        // A failed tick keeps the previous snapshot
        assert!(!app.poll_once(&mut inverter_adopter, &mut charger_adopter).await);
        let kept = inverter_adopter.current().unwrap();
        assert!((kept.battery.soc - 40.0).abs() < f64::EPSILON);

        // Newer inverter data is adopted even though the charger is unchanged
        assert!(app.poll_once(&mut inverter_adopter, &mut charger_adopter).await);
        let latest = inverter_adopter.current().unwrap();
        assert!((latest.battery.soc - 41.0).abs() < f64::EPSILON);
        assert!(charger_adopter.current().unwrap().online);
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_backend() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(500)
            .create_async()
            .await;

        let app = app_for(server.url()).await;
        assert!(app.run(Commands::Health).await.is_err());
    }
}

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

use crate::config::ConnectionConfig;
use crate::error::{ApiError, ApiResult, ConfigError};
use chrono::NaiveDate;
use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use solcharge_types::{
    Acknowledgement, AutomationConfig, AutomationConfigUpdate, AutomationMode, ChargerStatus,
    ChartKind, ChartPeriod, ChartResponse, InverterSnapshot, PriorityLoadReserve,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// The health check ignores the configured timeout
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

const HEALTH_PATH: &str = "/health";
const INVERTER_LATEST_PATH: &str = "/automation/solis/latest";
const INVERTER_REALTIME_PATH: &str = "/automation/solis/realtime";
const CHARGER_STATUS_PATH: &str = "/automation/zaptec/status";
const AUTOMATION_CONFIG_PATH: &str = "/automation/config";
const AUTOMATION_ENABLE_PATH: &str = "/automation/enable";
const AUTOMATION_DISABLE_PATH: &str = "/automation/disable";

/// A validated configuration together with the HTTP client built from it.
///
/// Requests clone the `Arc` at dispatch, so a request keeps the base URL and
/// headers it started with even if the configuration is replaced meanwhile.
#[derive(Debug)]
struct Binding {
    config: ConnectionConfig,
    base_url: String,
    http: Client,
}

impl Binding {
    fn build(config: ConnectionConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let headers = config.default_headers()?;

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            config,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// SolCharge automation backend REST API client.
///
/// One instance per process, shared by `Arc`. The active configuration can
/// be replaced at runtime with [`ApiClient::update_config`].
#[derive(Debug)]
pub struct ApiClient {
    binding: RwLock<Arc<Binding>>,
}

impl ApiClient {
    pub fn new(config: ConnectionConfig) -> Result<Self, ConfigError> {
        let binding = Binding::build(config)?;
        info!(
            "🔌 [API] Client ready: {} (timeout {} ms, simulation={})",
            binding.base_url, binding.config.timeout_ms, binding.config.simulation_mode
        );
        Ok(Self {
            binding: RwLock::new(Arc::new(binding)),
        })
    }

    /// Replace the active configuration.
    ///
    /// Takes effect for the next request. An invalid configuration is
    /// rejected and the current one stays active.
    pub fn update_config(&self, config: ConnectionConfig) -> Result<(), ConfigError> {
        let binding = Binding::build(config)?;
        info!(
            "🔁 [API] Configuration updated: {} (timeout {} ms, simulation={})",
            binding.base_url, binding.config.timeout_ms, binding.config.simulation_mode
        );
        *self.binding.write() = Arc::new(binding);
        Ok(())
    }

    /// Owned copy of the active configuration
    pub fn config(&self) -> ConnectionConfig {
        self.binding.read().config.clone()
    }

    fn current(&self) -> Arc<Binding> {
        Arc::clone(&self.binding.read())
    }

    // ==================== Generic primitives ====================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.get_with_query(path, &[]).await
    }

    /// GET with query parameters. Transport failures are retried with
    /// exponential backoff; HTTP error responses are not.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let binding = self.current();
        let url = binding.url(path);
        let retries = binding.config.retry_count;

        let response = Self::send_with_retry(&binding, &Method::GET, path, retries, || {
            binding.http.get(&url).query(query)
        })
        .await?;

        Self::read_json(&Method::GET, path, response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let binding = self.current();
        let url = binding.url(path);

        let response = Self::send_with_retry(&binding, &Method::POST, path, 0, || {
            let request = binding.http.post(&url);
            match body {
                Some(body) => request.json(body),
                None => request,
            }
        })
        .await?;

        Self::read_json(&Method::POST, path, response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let binding = self.current();
        let url = binding.url(path);

        let response =
            Self::send_with_retry(&binding, &Method::PUT, path, 0, || binding.http.put(&url).json(body))
                .await?;

        Self::read_json(&Method::PUT, path, response).await
    }

    /// Send a request, retrying only when no response was received
    async fn send_with_retry<F>(
        binding: &Binding,
        method: &Method,
        path: &str,
        retries: u32,
        build: F,
    ) -> ApiResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempts = 0;
        let mut delay = binding.config.retry_delay();

        loop {
            attempts += 1;
            match build().send().await {
                Ok(response) => return Ok(response),
                Err(e) if attempts > retries => {
                    let err = ApiError::transport(&e);
                    error!(
                        "❌ [API] {} {} failed after {} attempt(s): {}",
                        method, path, attempts, err.message
                    );
                    return Err(err);
                }
                Err(e) => {
                    warn!(
                        "⚠️ [API] {} {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        method,
                        path,
                        attempts,
                        retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
            }
        }
    }

    /// Log the response and decode its body, normalizing any failure
    async fn read_json<T: DeserializeOwned>(
        method: &Method,
        path: &str,
        response: Response,
    ) -> ApiResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::decode(status, e))?;

        debug!(
            method = %method,
            path,
            status = status.as_u16(),
            payload = %body,
            "📡 [API] Response"
        );

        if !status.is_success() {
            let err = ApiError::from_response(status, &body);
            error!(
                "❌ [API] {} {} returned {}: {}",
                method, path, err.status, err.message
            );
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            let err = ApiError::decode(status, &e);
            error!("❌ [API] {} {}: {}", method, path, err.message);
            err
        })
    }

    // ==================== Health ====================

    /// Check `GET /health` with a fixed 5 s timeout.
    ///
    /// Never fails: any error or non-200 status is reported as `false`.
    pub async fn test_connection(&self) -> bool {
        let binding = self.current();
        let url = binding.url(HEALTH_PATH);
        debug!("Performing health check against {}", url);

        match binding
            .http
            .get(&url)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => {
                debug!("Health check passed");
                true
            }
            Ok(response) => {
                warn!("Health check failed: status {}", response.status());
                false
            }
            Err(e) => {
                warn!("Health check failed: {}", ApiError::transport(&e).message);
                false
            }
        }
    }

    // ==================== Telemetry ====================

    /// Latest stored inverter snapshot
    pub async fn get_latest_inverter_data(&self) -> ApiResult<InverterSnapshot> {
        self.get(INVERTER_LATEST_PATH).await
    }

    /// Inverter snapshot read live from the device
    pub async fn get_realtime_inverter_data(&self) -> ApiResult<InverterSnapshot> {
        self.get(INVERTER_REALTIME_PATH).await
    }

    pub async fn get_charger_status(&self) -> ApiResult<ChargerStatus> {
        self.get(CHARGER_STATUS_PATH).await
    }

    /// Raw chart payload; see [`ApiClient::get_chart_series`] for the
    /// presentation-ready form.
    pub async fn get_chart(
        &self,
        kind: ChartKind,
        period: ChartPeriod,
        date: Option<NaiveDate>,
    ) -> ApiResult<ChartResponse> {
        let mut query = vec![("period", period.as_str().to_owned())];
        if let Some(date) = date {
            query.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        self.get_with_query(kind.path(), &query).await
    }

    // ==================== Automation ====================

    pub async fn get_automation_config(&self) -> ApiResult<AutomationConfig> {
        self.get(AUTOMATION_CONFIG_PATH).await
    }

    /// Send a partial configuration update. Callers validate the update
    /// before calling.
    pub async fn update_automation_config(
        &self,
        update: &AutomationConfigUpdate,
    ) -> ApiResult<Acknowledgement> {
        info!("⚙️ [API] Updating automation config: {:?}", update);
        self.put(AUTOMATION_CONFIG_PATH, update).await
    }

    pub async fn set_automation_mode(&self, mode: AutomationMode) -> ApiResult<Acknowledgement> {
        self.update_automation_config(&AutomationConfigUpdate::mode(mode))
            .await
    }

    pub async fn set_priority_load_reserve(
        &self,
        reserve: PriorityLoadReserve,
    ) -> ApiResult<Acknowledgement> {
        self.update_automation_config(&AutomationConfigUpdate::priority_load_reserve(reserve))
            .await
    }

    pub async fn set_never_stop_charging(&self, enabled: bool) -> ApiResult<Acknowledgement> {
        self.update_automation_config(&AutomationConfigUpdate::never_stop_charging(enabled))
            .await
    }

    pub async fn enable_automation(&self) -> ApiResult<Acknowledgement> {
        info!("▶️ [API] Enabling automation");
        self.post::<(), _>(AUTOMATION_ENABLE_PATH, None).await
    }

    pub async fn disable_automation(&self) -> ApiResult<Acknowledgement> {
        info!("⏸️ [API] Disabling automation");
        self.post::<(), _>(AUTOMATION_DISABLE_PATH, None).await
    }
}

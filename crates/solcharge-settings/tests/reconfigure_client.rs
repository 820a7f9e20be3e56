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

//! Settings changes pushed into a live API client

use mockito::{Matcher, Server};
use serde_json::json;
use solcharge_client::{ApiClient, ConnectionConfigPatch};
use solcharge_settings::{EnvDefaults, FileStore, SettingsStore};
use solcharge_types::AutomationMode;
use std::sync::Arc;
use tempfile::tempdir;

fn charger_body() -> String {
    json!({"timestamp": "2025-06-01T12:00:00Z", "online": true, "operatingMode": 1}).to_string()
}

#[tokio::test]
async fn test_backend_change_reaches_client() {
    let mut old_server = Server::new_async().await;
    let mut new_server = Server::new_async().await;

    let old_mock = old_server
        .mock("GET", "/automation/zaptec/status")
        .with_status(200)
        .with_body(charger_body())
        .expect(1)
        .create_async()
        .await;
    let new_mock = new_server
        .mock("GET", "/automation/config")
        .with_status(200)
        .with_body(json!({"mode": "manual"}).to_string())
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let env = EnvDefaults {
        base_url: old_server.url(),
        ..EnvDefaults::default()
    };
    let store = Arc::new(SettingsStore::new(FileStore::new(dir.path()), env));
    store.load_settings().await;
    let client = Arc::new(ApiClient::new(store.get_api_config()).unwrap());

    assert!(client.get_charger_status().await.unwrap().online);

    let config = store
        .update_api_config(&ConnectionConfigPatch::base_url(new_server.url()))
        .await
        .unwrap();
    client.update_config(config).unwrap();

    let automation = client.get_automation_config().await.unwrap();
    assert_eq!(automation.mode, AutomationMode::Manual);

    old_mock.assert_async().await;
    new_mock.assert_async().await;
}

#[tokio::test]
async fn test_persisted_credentials_survive_restart() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/automation/zaptec/status")
        .match_header("x-api-key", "user-key")
        .match_header("authorization", "Bearer session")
        .with_status(200)
        .with_body(charger_body())
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let env = || EnvDefaults {
        base_url: server.url(),
        ..EnvDefaults::default()
    };

    {
        let store = SettingsStore::new(FileStore::new(dir.path()), env());
        store.load_settings().await;
        store
            .update_api_config(&ConnectionConfigPatch {
                api_key: Some(Some("user-key".to_owned())),
                auth_token: Some(Some("session".to_owned())),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    // Next process start
    let store = SettingsStore::new(FileStore::new(dir.path()), env());
    store.load_settings().await;
    let client = ApiClient::new(store.get_api_config()).unwrap();

    client.get_charger_status().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cleared_token_is_not_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/automation/enable")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(json!({"success": true, "message": "ok", "timestamp": "t"}).to_string())
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let env = EnvDefaults {
        base_url: server.url(),
        ..EnvDefaults::default()
    };
    let store = SettingsStore::new(FileStore::new(dir.path()), env);
    store.load_settings().await;
    store
        .update_api_config(&ConnectionConfigPatch {
            auth_token: Some(Some("stale".to_owned())),
            ..Default::default()
        })
        .await
        .unwrap();
    let client = ApiClient::new(store.get_api_config()).unwrap();

    let config = store
        .update_api_config(&ConnectionConfigPatch {
            auth_token: Some(None),
            ..Default::default()
        })
        .await
        .unwrap();
    client.update_config(config).unwrap();

    assert!(client.enable_automation().await.unwrap().success);
    mock.assert_async().await;
}

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

use crate::Timestamped;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Zaptec charger status as served by `/automation/zaptec/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargerStatus {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub charging: bool,
    /// Charging power in watts
    #[serde(default)]
    pub power: f64,
    /// Current limit configured on the charger, in amperes
    #[serde(default)]
    pub configured_current: f64,
    #[serde(default)]
    pub vehicle_connected: bool,
    /// Raw Zaptec operating mode code
    #[serde(default)]
    pub operating_mode: u8,
    /// Energy delivered in the current session, in kWh
    #[serde(default)]
    pub session_energy: f64,
}

impl ChargerStatus {
    pub fn operating_mode(&self) -> ChargerOperatingMode {
        ChargerOperatingMode::from_code(self.operating_mode)
    }
}

impl Timestamped for ChargerStatus {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Zaptec operating modes (the charger API has no code 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargerOperatingMode {
    Unknown,
    Disconnected,
    ConnectedRequesting,
    ConnectedCharging,
    ConnectedFinished,
}

impl ChargerOperatingMode {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Disconnected,
            2 => Self::ConnectedRequesting,
            3 => Self::ConnectedCharging,
            5 => Self::ConnectedFinished,
            _ => Self::Unknown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Disconnected => "Disconnected",
            Self::ConnectedRequesting => "Waiting for power",
            Self::ConnectedCharging => "Charging",
            Self::ConnectedFinished => "Finished",
        }
    }
}

impl fmt::Display for ChargerOperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operating_mode_codes() {
        assert_eq!(ChargerOperatingMode::from_code(0), ChargerOperatingMode::Unknown);
        assert_eq!(
            ChargerOperatingMode::from_code(1),
            ChargerOperatingMode::Disconnected
        );
        assert_eq!(
            ChargerOperatingMode::from_code(3),
            ChargerOperatingMode::ConnectedCharging
        );
        assert_eq!(ChargerOperatingMode::from_code(4), ChargerOperatingMode::Unknown);
        assert_eq!(
            ChargerOperatingMode::from_code(5),
            ChargerOperatingMode::ConnectedFinished
        );
    }

    #[test]
    fn test_decode_status() {
        let status: ChargerStatus = serde_json::from_str(
            r#"{
                "timestamp": "2025-06-01T12:00:05Z",
                "online": true,
                "charging": true,
                "power": 7360.0,
                "configuredCurrent": 16.0,
                "vehicleConnected": true,
                "operatingMode": 3
            }"#,
        )
        .unwrap();

        assert!(status.charging);
        assert_eq!(
            status.operating_mode(),
            ChargerOperatingMode::ConnectedCharging
        );
        assert!(status.session_energy.abs() < f64::EPSILON);
    }
}

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

//! Solis inverter telemetry as served by `/automation/solis/*`.
//!
//! Power values are in watts, energy in kWh. Missing numbers decode to 0 so
//! a partially populated snapshot still renders; only the timestamp is
//! mandatory.

use crate::Timestamped;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InverterSnapshot {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub pv: PvData,
    #[serde(default)]
    pub ac: AcOutput,
    #[serde(default)]
    pub battery: BatteryData,
    #[serde(default)]
    pub grid: GridData,
    #[serde(default)]
    pub house: HouseData,
    #[serde(default)]
    pub energy: EnergyTotals,
}

impl Timestamped for InverterSnapshot {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl InverterSnapshot {
    /// Solar power not consumed by the house, in watts.
    ///
    /// Negative when the house draws more than the panels produce.
    pub fn surplus_w(&self) -> f64 {
        self.pv.total_power - self.house.consumption
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PvData {
    pub strings: Vec<PvString>,
    pub total_power: f64,
}

/// One MPPT string
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PvString {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcOutput {
    pub power: f64,
    pub voltage: f64,
    pub current: f64,
    pub frequency: f64,
}

/// Battery side of the hybrid inverter.
///
/// `power` is positive while charging and negative while discharging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatteryData {
    pub power: f64,
    pub voltage: f64,
    pub current: f64,
    pub soc: f64,
    pub soh: f64,
    pub charge_today: f64,
    pub discharge_today: f64,
}

/// Grid connection point; `power` is positive when importing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridData {
    pub power: f64,
    pub import_today: f64,
    pub export_today: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseData {
    pub consumption: f64,
    pub backup_load: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnergyTotals {
    pub yield_today: f64,
    pub yield_total: f64,
}

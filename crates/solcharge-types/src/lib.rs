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

//! Shared wire-format types for the SolCharge automation API.
//!
//! This crate defines the JSON contract between the automation backend and
//! the client crates. Wire names are camelCase because the backend speaks
//! JSON produced by a JavaScript service.

pub mod automation;
pub mod charger;
pub mod charts;
pub mod error;
pub mod inverter;

use chrono::{DateTime, Utc};

pub use automation::{
    Acknowledgement, AutomationConfig, AutomationConfigUpdate, AutomationMode, PriorityLoadReserve,
};
pub use charger::{ChargerOperatingMode, ChargerStatus};
pub use charts::{ChartKind, ChartPeriod, ChartResponse, RawChartPoint, RawChartSeries, RawTimestamp};
pub use error::ValidationError;
pub use inverter::{
    AcOutput, BatteryData, EnergyTotals, GridData, HouseData, InverterSnapshot, PvData, PvString,
};

/// A payload that carries its own capture time.
///
/// Used to decide whether a freshly fetched snapshot supersedes the one
/// currently displayed.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

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

//! Server-side charging automation configuration.
//!
//! The backend owns this resource. The client reads it, sends partial
//! updates and never caches it.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============= Automation Mode =============

/// Charging strategy selected on the automation server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationMode {
    /// Charge only from solar surplus
    Surplus,
    /// Automation leaves the charger alone
    Manual,
    /// Charge at minimum current, topped up by surplus
    Minimum,
    /// Always charge at minimum current, even from the grid
    ForceMinimum,
}

impl AutomationMode {
    /// Wire/config string value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Surplus => "surplus",
            Self::Manual => "manual",
            Self::Minimum => "minimum",
            Self::ForceMinimum => "force_minimum",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Surplus => "Solar surplus",
            Self::Manual => "Manual",
            Self::Minimum => "Minimum + surplus",
            Self::ForceMinimum => "Forced minimum",
        }
    }

    pub fn all() -> &'static [AutomationMode] {
        &[
            Self::Surplus,
            Self::Manual,
            Self::Minimum,
            Self::ForceMinimum,
        ]
    }
}

impl fmt::Display for AutomationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AutomationMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "surplus" => Ok(Self::Surplus),
            "manual" => Ok(Self::Manual),
            "minimum" => Ok(Self::Minimum),
            "force_minimum" => Ok(Self::ForceMinimum),
            _ => Err(ValidationError::UnknownMode(s.to_owned())),
        }
    }
}

// ============= Priority Load Reserve =============

/// Watts kept back for household priority loads before surplus is handed
/// to the charger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityLoadReserve(u32);

impl PriorityLoadReserve {
    /// Largest reserve accepted by the backend
    pub const MAX_WATTS: u32 = 100_000;

    pub fn watts(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for PriorityLoadReserve {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u32::try_from(value) {
            Ok(watts) if watts <= Self::MAX_WATTS => Ok(Self(watts)),
            _ => Err(ValidationError::ReserveOutOfRange {
                value,
                max: Self::MAX_WATTS,
            }),
        }
    }
}

impl fmt::Display for PriorityLoadReserve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} W", self.0)
    }
}

// ============= Configuration =============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConfig {
    pub mode: AutomationMode,
    #[serde(default)]
    pub priority_load_reserve: u32,
    #[serde(default)]
    pub never_stop_charging: bool,
}

/// Partial update sent with `PUT /automation/config`.
///
/// Absent fields are omitted from the body and left unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<AutomationMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_load_reserve: Option<PriorityLoadReserve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub never_stop_charging: Option<bool>,
}

impl AutomationConfigUpdate {
    pub fn mode(mode: AutomationMode) -> Self {
        Self {
            mode: Some(mode),
            ..Default::default()
        }
    }

    pub fn priority_load_reserve(reserve: PriorityLoadReserve) -> Self {
        Self {
            priority_load_reserve: Some(reserve),
            ..Default::default()
        }
    }

    pub fn never_stop_charging(enabled: bool) -> Self {
        Self {
            never_stop_charging: Some(enabled),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.priority_load_reserve.is_none()
            && self.never_stop_charging.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        Ok(())
    }
}

// ============= Acknowledgement =============

/// Response body of every write endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
}

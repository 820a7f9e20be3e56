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

//! Raw time-series payloads from `/automation/charts/*`.

use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPeriod {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl ChartPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(ValidationError::UnknownPeriod(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    SolarProduction,
    GridExchange,
    Battery,
    Dashboard,
}

impl ChartKind {
    /// Endpoint path relative to the backend base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::SolarProduction => "/automation/charts/solar-production",
            Self::GridExchange => "/automation/charts/grid-exchange",
            Self::Battery => "/automation/charts/battery",
            Self::Dashboard => "/automation/charts/dashboard",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SolarProduction => "solar-production",
            Self::GridExchange => "grid-exchange",
            Self::Battery => "battery",
            Self::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "solar-production" | "solar" => Ok(Self::SolarProduction),
            "grid-exchange" | "grid" => Ok(Self::GridExchange),
            "battery" => Ok(Self::Battery),
            "dashboard" => Ok(Self::Dashboard),
            _ => Err(ValidationError::UnknownChartKind(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    pub period: ChartPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub series: Vec<RawChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChartSeries {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub points: Vec<RawChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChartPoint {
    pub timestamp: RawTimestamp,
    pub value: f64,
}

/// Chart timestamps arrive either as RFC 3339 strings or epoch milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    EpochMillis(i64),
    Text(String),
}

impl RawTimestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::EpochMillis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_and_kind_parsing() {
        assert_eq!("Week".parse::<ChartPeriod>().unwrap(), ChartPeriod::Week);
        assert!("decade".parse::<ChartPeriod>().is_err());
        assert_eq!(
            "grid_exchange".parse::<ChartKind>().unwrap(),
            ChartKind::GridExchange
        );
        assert_eq!(
            ChartKind::SolarProduction.path(),
            "/automation/charts/solar-production"
        );
    }

    #[test]
    fn test_raw_timestamp_variants() {
        let point: RawChartPoint =
            serde_json::from_str(r#"{"timestamp": 1717243200000, "value": 1.5}"#).unwrap();
        assert_eq!(
            point.timestamp.to_utc().unwrap().to_rfc3339(),
            "2024-06-01T12:00:00+00:00"
        );

        let point: RawChartPoint =
            serde_json::from_str(r#"{"timestamp": "2024-06-01T14:00:00+02:00", "value": 1.5}"#)
                .unwrap();
        assert_eq!(
            point.timestamp.to_utc().unwrap().to_rfc3339(),
            "2024-06-01T12:00:00+00:00"
        );

        assert!(RawTimestamp::Text("yesterday".to_owned()).to_utc().is_none());
    }
}

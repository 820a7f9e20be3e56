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

//! Presentation-ready chart series.
//!
//! The backend serves raw points with mixed timestamp encodings in arbitrary
//! order. [`reshape_in`] turns them into sorted, labelled points in a given
//! time zone.

use crate::client::ApiClient;
use crate::error::ApiResult;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use solcharge_types::{ChartKind, ChartPeriod, ChartResponse, RawChartSeries};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub at: DateTime<Utc>,
    /// Axis label for the point, formatted for the chart period
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub unit: Option<String>,
    pub points: Vec<ChartPoint>,
}

fn label_format(period: ChartPeriod) -> &'static str {
    match period {
        ChartPeriod::Day => "%H:%M",
        ChartPeriod::Week => "%a",
        ChartPeriod::Month => "%-d",
        ChartPeriod::Year => "%b",
    }
}

/// Reshape a raw chart response, labelling points in `tz`.
///
/// Points with unparseable timestamps or non-finite values are dropped.
pub fn reshape_in<Tz>(response: ChartResponse, tz: &Tz) -> Vec<ChartSeries>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let format = label_format(response.period);

    response
        .series
        .into_iter()
        .map(|series| reshape_series(series, tz, format))
        .collect()
}

fn reshape_series<Tz>(series: RawChartSeries, tz: &Tz, format: &str) -> ChartSeries
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let total = series.points.len();
    let mut points: Vec<ChartPoint> = series
        .points
        .into_iter()
        .filter(|point| point.value.is_finite())
        .filter_map(|point| {
            let at = point.timestamp.to_utc()?;
            Some(ChartPoint {
                label: at.with_timezone(tz).format(format).to_string(),
                at,
                value: point.value,
            })
        })
        .collect();
    points.sort_by_key(|point| point.at);

    if points.len() < total {
        debug!(
            "Dropped {} invalid point(s) from chart series '{}'",
            total - points.len(),
            series.name
        );
    }

    ChartSeries {
        name: series.name,
        unit: series.unit,
        points,
    }
}

impl ApiClient {
    /// Fetch a chart and reshape it in the local time zone
    pub async fn get_chart_series(
        &self,
        kind: ChartKind,
        period: ChartPeriod,
        date: Option<NaiveDate>,
    ) -> ApiResult<Vec<ChartSeries>> {
        let response = self.get_chart(kind, period, date).await?;
        Ok(reshape_in(response, &Local))
    }
}

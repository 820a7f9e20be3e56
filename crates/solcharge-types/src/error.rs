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

use thiserror::Error;

/// Input rejected before it is sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Priority load reserve must be between 0 and {max} W, got {value}")]
    ReserveOutOfRange { value: i64, max: u32 },

    #[error("Automation update contains no changes")]
    EmptyUpdate,

    #[error("Unknown automation mode: '{0}'. Supported modes: surplus, manual, minimum, force_minimum")]
    UnknownMode(String),

    #[error("Unknown chart period: '{0}'. Supported periods: day, week, month, year")]
    UnknownPeriod(String),

    #[error(
        "Unknown chart kind: '{0}'. Supported kinds: solar-production, grid-exchange, battery, dashboard"
    )]
    UnknownChartKind(String),
}

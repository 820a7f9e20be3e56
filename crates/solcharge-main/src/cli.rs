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

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, builder::BoolishValueParser};
use solcharge_settings::DEFAULT_DATA_DIR;
use solcharge_types::{AutomationMode, ChartKind, ChartPeriod};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "solcharge", version, about = "SolCharge automation backend client")]
#[command(
    long_about = "Command-line client for the SolCharge solar charging automation backend.\n\
    \nReads Solis inverter telemetry and Zaptec charger status, edits the automation\n\
    configuration and manages the stored connection settings.\n\
    \nConnection defaults come from API_BASE_URL, API_TIMEOUT, API_RETRY_COUNT,\n\
    API_RETRY_DELAY, API_USE_HTTPS, SIMULATION_MODE and API_KEY.\n\
    \nExamples:\n  \
    solcharge status                          # Inverter and charger at a glance\n  \
    solcharge watch --interval 10             # Poll until Ctrl-C\n  \
    solcharge automation mode surplus         # Switch charging strategy\n  \
    solcharge settings set-backend 10.0.0.7 3000"
)]
pub struct Cli {
    /// Directory holding the persisted settings
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Keep settings in memory only (nothing is written to disk)
    #[arg(long, global = true)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show current inverter and charger state
    Status,

    /// Poll inverter and charger state until interrupted
    #[command(
        long_about = "Poll the backend on an interval and print each new snapshot.\n\
        \nA failed poll is logged and the previous snapshot stays on screen.\n\
        Snapshots older than the one already shown are discarded.\n\
        \nExamples:\n  \
        solcharge watch\n  \
        solcharge watch --interval 5"
    )]
    Watch {
        /// Seconds between polls (defaults to the stored refresh interval)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Check whether the backend is reachable
    Health,

    /// Read or change the automation configuration
    Automation {
        #[command(subcommand)]
        action: AutomationCommand,
    },

    /// Print chart data
    Chart(ChartArgs),

    /// Show or change stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum AutomationCommand {
    /// Show the automation configuration
    Show,
    /// Enable automation
    Enable,
    /// Disable automation
    Disable,
    /// Set the charging strategy (surplus, manual, minimum, force_minimum)
    Mode { mode: AutomationMode },
    /// Set the priority load reserve in watts
    Reserve {
        #[arg(allow_negative_numbers = true)]
        watts: i64,
    },
    /// Keep charging even without surplus (true/false)
    NeverStop {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
}

#[derive(Parser, Debug, PartialEq, Eq)]
pub struct ChartArgs {
    /// Chart kind (solar-production, grid-exchange, battery, dashboard)
    pub kind: ChartKind,

    /// Aggregation period (day, week, month, year)
    #[arg(long, default_value = "day")]
    pub period: ChartPeriod,

    /// Reference date, YYYY-MM-DD (defaults to today on the backend)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SettingsCommand {
    /// Show stored settings
    Show,
    /// Point the client at a backend by IPv4 address (or localhost) and port
    SetBackend { ip: String, port: u16 },
    /// Drop the backend override and use the default address
    ResetUrl,
    /// Restore the API key from the environment
    ResetApiKey,
    /// Switch simulation mode on or off
    ToggleSimulation,
    /// Store a bearer token
    SetToken { token: String },
    /// Remove the stored bearer token
    ClearToken,
    /// Delete all stored settings
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("solcharge").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_global_options() {
        let cli = parse(&["status"]);
        assert_eq!(cli.data_dir, PathBuf::from("./data"));
        assert!(!cli.memory);

        let cli = parse(&["health", "--memory", "--data-dir", "/tmp/sc"]);
        assert!(cli.memory);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/sc"));
    }

    #[test]
    fn test_automation_commands() {
        let cli = parse(&["automation", "mode", "force-minimum"]);
        assert!(matches!(
            cli.command,
            Commands::Automation {
                action: AutomationCommand::Mode {
                    mode: AutomationMode::ForceMinimum
                }
            }
        ));

        // Negative values reach validation instead of being parsed as flags
        let cli = parse(&["automation", "reserve", "-5"]);
        assert!(matches!(
            cli.command,
            Commands::Automation {
                action: AutomationCommand::Reserve { watts: -5 }
            }
        ));

        let cli = parse(&["automation", "never-stop", "false"]);
        assert!(matches!(
            cli.command,
            Commands::Automation {
                action: AutomationCommand::NeverStop { enabled: false }
            }
        ));

        assert!(Cli::try_parse_from(["solcharge", "automation", "mode", "turbo"]).is_err());
    }

    #[test]
    fn test_chart_args() {
        let cli = parse(&["chart", "grid", "--period", "month", "--date", "2025-06-01"]);
        let Commands::Chart(args) = cli.command else {
            panic!("expected chart command");
        };
        assert_eq!(args.kind, ChartKind::GridExchange);
        assert_eq!(args.period, ChartPeriod::Month);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 6, 1));

        assert!(Cli::try_parse_from(["solcharge", "chart", "battery", "--date", "June"]).is_err());
    }

    #[test]
    fn test_settings_commands() {
        let cli = parse(&["settings", "set-backend", "10.0.0.7", "3000"]);
        assert!(matches!(
            cli.command,
            Commands::Settings {
                action: SettingsCommand::SetBackend { ref ip, port: 3000 }
            } if ip == "10.0.0.7"
        ));

        assert!(Cli::try_parse_from(["solcharge", "settings", "set-backend", "10.0.0.7", "70000"]).is_err());
    }

    #[test]
    fn test_watch_interval_must_be_positive() {
        let cli = parse(&["watch", "--interval", "5"]);
        assert!(matches!(cli.command, Commands::Watch { interval: Some(5) }));
        assert!(Cli::try_parse_from(["solcharge", "watch", "--interval", "0"]).is_err());
    }
}

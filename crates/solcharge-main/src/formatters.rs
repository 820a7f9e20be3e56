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

//! Terminal tables for command output.

use chrono::Local;
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use solcharge_client::{ChartSeries, ConnectionConfig};
use solcharge_settings::{AppSettings, Units};
use solcharge_types::{AutomationConfig, ChargerStatus, InverterSnapshot};

fn table_with_header(columns: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        columns
            .iter()
            .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn yes_no(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no")
    }
}

fn redacted(value: Option<&String>) -> &'static str {
    if value.is_some() { "set" } else { "-" }
}

#[derive(Debug)]
pub struct TableFormatter;

impl TableFormatter {
    /// Inverter and charger side by side in one key/value table
    pub fn format_status(
        inverter: &InverterSnapshot,
        charger: &ChargerStatus,
        units: Units,
    ) -> String {
        let mut table = table_with_header(&["Reading", "Value"]);

        table.add_row(vec![
            Cell::new("PV power"),
            Cell::new(units.format_power(inverter.pv.total_power)),
        ]);
        for (index, string) in inverter.pv.strings.iter().enumerate() {
            table.add_row(vec![
                Cell::new(format!("  PV{}", index + 1)),
                Cell::new(format!(
                    "{} ({:.1} V, {:.1} A)",
                    units.format_power(string.power),
                    string.voltage,
                    string.current
                )),
            ]);
        }
        table.add_row(vec![
            Cell::new("House consumption"),
            Cell::new(units.format_power(inverter.house.consumption)),
        ]);
        table.add_row(vec![
            Cell::new("Surplus"),
            Cell::new(units.format_power(inverter.surplus_w())),
        ]);
        table.add_row(vec![
            Cell::new("Grid"),
            Cell::new(units.format_power(inverter.grid.power)),
        ]);
        table.add_row(vec![
            Cell::new("Battery"),
            Cell::new(format!(
                "{:.0}% ({})",
                inverter.battery.soc,
                units.format_power(inverter.battery.power)
            )),
        ]);
        table.add_row(vec![
            Cell::new("Yield today"),
            Cell::new(format!("{:.1} kWh", inverter.energy.yield_today)),
        ]);
        table.add_row(vec![Cell::new("Charger online"), yes_no(charger.online)]);
        table.add_row(vec![
            Cell::new("Charger state"),
            Cell::new(charger.operating_mode().display_name()),
        ]);
        table.add_row(vec![
            Cell::new("Charging power"),
            Cell::new(units.format_power(charger.power)),
        ]);
        table.add_row(vec![
            Cell::new("Session energy"),
            Cell::new(format!("{:.2} kWh", charger.session_energy)),
        ]);

        format!(
            "{table}\nInverter data from {} | Charger data from {}\n",
            inverter.timestamp.with_timezone(&Local).format("%H:%M:%S"),
            charger.timestamp.with_timezone(&Local).format("%H:%M:%S")
        )
    }

    pub fn format_automation(config: &AutomationConfig) -> String {
        let mut table = table_with_header(&["Setting", "Value"]);
        table.add_row(vec![
            Cell::new("Mode"),
            Cell::new(format!("{} ({})", config.mode.display_name(), config.mode.as_str())),
        ]);
        table.add_row(vec![
            Cell::new("Priority load reserve"),
            Cell::new(format!("{} W", config.priority_load_reserve)),
        ]);
        table.add_row(vec![
            Cell::new("Never stop charging"),
            yes_no(config.never_stop_charging),
        ]);
        table.to_string()
    }

    pub fn format_settings(settings: &AppSettings, connection: &ConnectionConfig) -> String {
        let mut table = table_with_header(&["Setting", "Value"]);
        let rows: Vec<(&str, String)> = vec![
            ("Backend URL", connection.base_url.clone()),
            (
                "Custom backend",
                settings.custom_base_url.clone().unwrap_or_else(|| "-".to_owned()),
            ),
            ("Simulation mode", settings.simulation_mode.to_string()),
            ("HTTPS", settings.use_https.to_string()),
            ("Timeout", format!("{} ms", settings.timeout_ms)),
            (
                "Retries",
                format!("{} (initial delay {} ms)", settings.retry_count, settings.retry_delay_ms),
            ),
            ("API key", redacted(settings.api_key.as_ref()).to_owned()),
            ("Auth token", redacted(settings.auth_token.as_ref()).to_owned()),
            ("Refresh interval", format!("{} s", settings.refresh_interval_secs)),
            ("Theme", settings.theme.to_string()),
            ("Notifications", settings.notifications_enabled.to_string()),
            ("Units", settings.units.to_string()),
            ("Language", settings.language.to_string()),
        ];
        for (name, value) in rows {
            table.add_row(vec![Cell::new(name), Cell::new(value)]);
        }
        table.to_string()
    }

    pub fn format_chart(series: &[ChartSeries]) -> String {
        if series.is_empty() {
            return "No chart data\n".to_owned();
        }

        let mut output = String::new();
        for entry in series {
            let unit = entry.unit.as_deref().unwrap_or("");
            let mut table = table_with_header(&["Time", entry.name.as_str()]);
            for point in &entry.points {
                table.add_row(vec![
                    Cell::new(&point.label),
                    Cell::new(format!("{:.2} {unit}", point.value).trim_end()),
                ]);
            }
            output.push_str(&table.to_string());
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use solcharge_client::ChartPoint;
    use solcharge_types::AutomationMode;

    #[test]
    fn test_format_automation() {
        let output = TableFormatter::format_automation(&AutomationConfig {
            mode: AutomationMode::Surplus,
            priority_load_reserve: 1500,
            never_stop_charging: true,
        });

        assert!(output.contains("Solar surplus (surplus)"));
        assert!(output.contains("1500 W"));
        assert!(output.contains("yes"));
    }

    #[test]
    fn test_format_settings_hides_credentials() {
        let settings = AppSettings {
            api_key: Some("super-secret".to_owned()),
            ..AppSettings::default()
        };
        let output = TableFormatter::format_settings(&settings, &settings.connection_config());

        assert!(!output.contains("super-secret"));
        assert!(output.contains("http://192.168.1.50:3000"));
        assert!(output.contains("kilowatts"));
    }

    #[test]
    fn test_format_status_uses_units() {
        let inverter: InverterSnapshot = serde_json::from_value(serde_json::json!({
            "timestamp": "2025-06-01T12:00:00Z",
            "pv": {"totalPower": 4200.0},
            "house": {"consumption": 1200.0}
        }))
        .unwrap();
        let charger: ChargerStatus = serde_json::from_value(serde_json::json!({
            "timestamp": "2025-06-01T12:00:00Z",
            "online": true,
            "operatingMode": 3
        }))
        .unwrap();

        let output = TableFormatter::format_status(&inverter, &charger, Units::Kilowatts);
        assert!(output.contains("4.20 kW"));
        assert!(output.contains("3.00 kW"));
        assert!(output.contains("Charging"));

        let output = TableFormatter::format_status(&inverter, &charger, Units::Watts);
        assert!(output.contains("4200 W"));
    }

    #[test]
    fn test_format_chart() {
        assert_eq!(TableFormatter::format_chart(&[]), "No chart data\n");

        let output = TableFormatter::format_chart(&[ChartSeries {
            name: "pv".to_owned(),
            unit: Some("kW".to_owned()),
            points: vec![ChartPoint {
                at: Utc::now(),
                label: "12:00".to_owned(),
                value: 2.5,
            }],
        }]);
        assert!(output.contains("12:00"));
        assert!(output.contains("2.50 kW"));
    }
}

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

//! Backend address helpers used by the settings screen

use crate::error::{SettingsError, SettingsResult};
use solcharge_client::Url;
use std::fmt;
use std::net::Ipv4Addr;

pub const FALLBACK_BACKEND_IP: &str = "192.168.1.50";
pub const FALLBACK_BACKEND_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendAddress {
    pub ip: String,
    pub port: u16,
}

impl BackendAddress {
    pub fn fallback() -> Self {
        Self {
            ip: FALLBACK_BACKEND_IP.to_owned(),
            port: FALLBACK_BACKEND_PORT,
        }
    }
}

impl fmt::Display for BackendAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Best-effort extraction of host and port from a backend URL.
///
/// Never fails: anything unparseable yields [`BackendAddress::fallback`].
pub fn parse_backend_url(url: &str) -> BackendAddress {
    let Ok(parsed) = Url::parse(url) else {
        return BackendAddress::fallback();
    };

    match (parsed.host_str(), parsed.port_or_known_default()) {
        (Some(host), Some(port)) if !host.is_empty() => BackendAddress {
            ip: host.to_owned(),
            port,
        },
        _ => BackendAddress::fallback(),
    }
}

/// Strict dotted-quad IPv4 or the literal `localhost`
pub fn validate_ip(ip: &str) -> SettingsResult<()> {
    if ip == "localhost" || ip.parse::<Ipv4Addr>().is_ok() {
        Ok(())
    } else {
        Err(SettingsError::InvalidIp(ip.to_owned()))
    }
}

pub fn validate_port(port: u16) -> SettingsResult<()> {
    if port == 0 {
        return Err(SettingsError::InvalidPort(port));
    }
    Ok(())
}

pub fn compose_backend_url(ip: &str, port: u16, use_https: bool) -> String {
    let scheme = if use_https { "https" } else { "http" };
    format!("{scheme}://{ip}:{port}")
}

// Copyright (C) 2025 rrrrrzy
// SPDX-License-Identifier: GPL-3.0-or-later
//
// --------------------------------------------------
// 致敬所有在深夜调试代码的灵魂。
// 即便 Bug 如山，我亦往矣。
// --------------------------------------------------
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use std::fs;
use std::path::Path;

use protocol::{ipv4::Ipv4Addr, mac::MacAddr};
use tracing::warn;

use crate::cli::WatchArgs;
use crate::error::WakeError;

/// Validated watch parameters, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub device_ip: Ipv4Addr,
    pub device_mac: MacAddr,
    pub interface: String,
    pub broadcast: Ipv4Addr,
    pub port: u16,
}

/// Values as typed by the user, before validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct RawConfig {
    ip: Option<String>,
    mac: Option<String>,
    device: Option<String>,
    broadcast: Option<String>,
}

pub fn load_config(args: &WatchArgs) -> Result<WatchConfig, WakeError> {
    let mut raw = match &args.config {
        Some(path) => load_from_file(path)?,
        None => RawConfig::default(),
    };

    // command line wins over the file
    if args.ip.is_some() {
        raw.ip = args.ip.clone();
    }
    if args.mac.is_some() {
        raw.mac = args.mac.clone();
    }
    if args.device.is_some() {
        raw.device = args.device.clone();
    }
    if args.broadcast.is_some() {
        raw.broadcast = args.broadcast.clone();
    }

    // zero blocks forever and negative never blocks; both break shutdown polling
    if args.timeout_ms <= 0 {
        return Err(WakeError::Configuration(format!(
            "receive timeout must be at least 1 ms, got {}",
            args.timeout_ms
        )));
    }

    raw.validate(args.port)
}

fn load_from_file(path: &Path) -> Result<RawConfig, WakeError> {
    let content = fs::read_to_string(path).map_err(|err| {
        WakeError::Configuration(format!(
            "failed to read config file {}: {err}",
            path.display()
        ))
    })?;
    Ok(parse_config(&content))
}

fn parse_config(content: &str) -> RawConfig {
    let mut raw = RawConfig::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = Some(value.trim().to_string());

            match key {
                "ip" => raw.ip = value,
                "mac" => raw.mac = value,
                "device" | "iface" => raw.device = value,
                "broadcast" => raw.broadcast = value,
                _ => warn!("unknown config key: {key}"),
            }
        } else {
            warn!("ignoring config line without '=': {line}");
        }
    }

    raw
}

impl RawConfig {
    fn validate(self, port: u16) -> Result<WatchConfig, WakeError> {
        let ip = required(self.ip, "IP address of device to wake up")?;
        let mac = required(self.mac, "MAC (hardware) address of device to wake up")?;
        let device = required(self.device, "network device to watch traffic on")?;
        let broadcast = required(self.broadcast, "broadcast IP")?;

        let device_ip = ip.parse::<Ipv4Addr>().map_err(|err| {
            WakeError::Configuration(format!("invalid IP address \"{ip}\": {err}"))
        })?;
        let device_mac = mac.parse::<MacAddr>().map_err(|err| {
            WakeError::Configuration(format!("invalid MAC address \"{mac}\": {err}"))
        })?;
        let broadcast = broadcast.parse::<Ipv4Addr>().map_err(|err| {
            WakeError::Configuration(format!(
                "invalid broadcast address \"{broadcast}\": {err}"
            ))
        })?;
        if port == 0 {
            return Err(WakeError::Configuration(
                "magic packet port must not be 0".into(),
            ));
        }

        Ok(WatchConfig {
            device_ip,
            device_mac,
            interface: device,
            broadcast,
            port,
        })
    }
}

fn required(value: Option<String>, what: &str) -> Result<String, WakeError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(WakeError::Configuration(format!("{what} not specified"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> WatchArgs {
        WatchArgs {
            ip: Some("10.0.0.9".into()),
            mac: Some("AA:BB:CC:DD:EE:FF".into()),
            device: Some("eth0".into()),
            broadcast: Some("10.0.0.255".into()),
            config: None,
            port: 9,
            timeout_ms: 500,
            debug: false,
        }
    }

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "arp_wake_{name}_{}.conf",
            std::process::id()
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn flags_produce_validated_config() {
        let config = load_config(&args()).unwrap();
        assert_eq!(config.device_ip, Ipv4Addr::new(10, 0, 0, 9));
        assert_eq!(
            config.device_mac,
            MacAddr::from_raw([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF])
        );
        assert_eq!(config.interface, "eth0");
        assert_eq!(config.broadcast, Ipv4Addr::new(10, 0, 0, 255));
        assert_eq!(config.port, 9);
    }

    #[test]
    fn each_missing_value_is_reported() {
        for (field, needle) in [
            ("ip", "IP address"),
            ("mac", "MAC"),
            ("device", "network device"),
            ("broadcast", "broadcast"),
        ] {
            let mut args = args();
            match field {
                "ip" => args.ip = None,
                "mac" => args.mac = None,
                "device" => args.device = None,
                _ => args.broadcast = Some(String::new()),
            }
            let err = load_config(&args).unwrap_err();
            assert!(matches!(err, WakeError::Configuration(_)));
            assert!(err.to_string().contains(needle), "{err}");
        }
    }

    #[test]
    fn malformed_values_are_rejected() {
        let mut bad_mac = args();
        bad_mac.mac = Some("AA:BB:CC:DD:EE".into());
        assert!(matches!(
            load_config(&bad_mac),
            Err(WakeError::Configuration(_))
        ));

        let mut bad_ip = args();
        bad_ip.ip = Some("10.0.0.300".into());
        assert!(matches!(
            load_config(&bad_ip),
            Err(WakeError::Configuration(_))
        ));

        let mut bad_broadcast = args();
        bad_broadcast.broadcast = Some("broadcast".into());
        assert!(matches!(
            load_config(&bad_broadcast),
            Err(WakeError::Configuration(_))
        ));

        let mut bad_port = args();
        bad_port.port = 0;
        assert!(matches!(
            load_config(&bad_port),
            Err(WakeError::Configuration(_))
        ));

        for timeout_ms in [0, -1] {
            let mut bad_timeout = args();
            bad_timeout.timeout_ms = timeout_ms;
            let err = load_config(&bad_timeout).unwrap_err();
            assert!(matches!(err, WakeError::Configuration(_)));
            assert!(err.to_string().contains("receive timeout"), "{err}");
        }
    }

    #[test]
    fn parses_config_file_lines() {
        let raw = parse_config(
            "# watched host\n\
             ip = 192.168.1.20\n\
             mac=aa:bb:cc:dd:ee:ff\n\
             \n\
             iface=enp3s0\n\
             broadcast=192.168.1.255\n\
             colour=blue\n",
        );
        assert_eq!(raw.ip.as_deref(), Some("192.168.1.20"));
        assert_eq!(raw.mac.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(raw.device.as_deref(), Some("enp3s0"));
        assert_eq!(raw.broadcast.as_deref(), Some("192.168.1.255"));
    }

    #[test]
    fn flags_override_config_file() {
        let path = temp_config(
            "override",
            "ip=192.168.1.20\nmac=aa:bb:cc:dd:ee:ff\ndevice=enp3s0\nbroadcast=192.168.1.255\n",
        );
        let args = WatchArgs {
            ip: None,
            mac: None,
            device: Some("wlan0".into()),
            broadcast: None,
            config: Some(path.clone()),
            port: 7,
            timeout_ms: 500,
            debug: false,
        };
        let config = load_config(&args).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.device_ip, Ipv4Addr::new(192, 168, 1, 20));
        assert_eq!(config.interface, "wlan0");
        assert_eq!(config.broadcast, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(config.port, 7);
    }

    #[test]
    fn unreadable_config_file_is_a_configuration_error() {
        let mut args = args();
        args.config = Some(PathBuf::from("/nonexistent/arp_wake.conf"));
        let err = load_config(&args).unwrap_err();
        assert!(matches!(err, WakeError::Configuration(_)));
        assert!(err.to_string().contains("/nonexistent/arp_wake.conf"));
    }
}

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

use std::net::IpAddr;

use anyhow::{Context, Result};
use pcap::Device;
use protocol::ipv4::Ipv4Addr;

use crate::error::WakeError;

pub fn list_adapters() -> Result<()> {
    let devices = Device::list().context("failed to enumerate network interfaces")?;
    if devices.is_empty() {
        println!("libpcap did not report any usable interface.");
        return Ok(());
    }
    for (idx, dev) in devices.iter().enumerate() {
        let ipv4 = first_ipv4(dev.addresses.iter().map(|a| a.addr))
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "no IPv4".to_string());
        match dev.desc.as_deref() {
            Some(desc) => println!("{}. {} [{}] ({})", idx + 1, dev.name, ipv4, desc),
            None => println!("{}. {} [{}]", idx + 1, dev.name, ipv4),
        }
    }
    Ok(())
}

/// IPv4 address currently bound to `interface`.
pub fn resolve_local_ip(interface: &str) -> Result<Ipv4Addr, WakeError> {
    let not_found = |reason: String| WakeError::InterfaceNotFound {
        name: interface.to_string(),
        reason,
    };

    let devices = Device::list().map_err(|err| not_found(err.to_string()))?;
    let device = devices
        .iter()
        .find(|dev| dev.name == interface)
        .ok_or_else(|| not_found("no such interface".to_string()))?;

    first_ipv4(device.addresses.iter().map(|a| a.addr))
        .ok_or_else(|| not_found("no IPv4 address bound".to_string()))
}

fn first_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(v4) => Some(Ipv4Addr::from(v4)),
        IpAddr::V6(_) => None,
    })
}

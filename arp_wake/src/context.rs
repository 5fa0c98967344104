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

use protocol::ipv4::Ipv4Addr;
use protocol::wol::MagicPacket;

use crate::config::WatchConfig;

/// Everything the capture path needs, built once at startup and handed down
/// explicitly.
#[derive(Debug, Clone)]
pub struct WakeContext {
    config: WatchConfig,
    local_ip: Ipv4Addr,
    magic_packet: MagicPacket,
}

impl WakeContext {
    pub fn new(config: WatchConfig, local_ip: Ipv4Addr) -> Self {
        let magic_packet = MagicPacket::build(config.device_mac);
        Self {
            config,
            local_ip,
            magic_packet,
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Address of the watched interface, resolved once. Not refreshed if it
    /// changes later (e.g. DHCP renewal).
    pub fn local_ip(&self) -> Ipv4Addr {
        self.local_ip
    }

    pub fn watched_ip(&self) -> Ipv4Addr {
        self.config.device_ip
    }

    pub fn magic_packet(&self) -> &MagicPacket {
        &self.magic_packet
    }
}

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

use std::io;
use std::net::{self, SocketAddrV4, UdpSocket};

use protocol::ipv4::Ipv4Addr;
use protocol::wol::{MagicPacket, MAGIC_PACKET_LEN};
use tracing::debug;

use crate::error::WakeError;

/// Where a triggered wake goes.
pub trait WakeSender {
    fn send(&mut self, packet: &MagicPacket) -> Result<(), WakeError>;
}

/// Sends each magic packet from a fresh broadcast-enabled UDP socket that is
/// closed again before `send` returns.
#[derive(Debug, Clone)]
pub struct UdpBroadcaster {
    target: SocketAddrV4,
}

impl UdpBroadcaster {
    pub fn new(broadcast: Ipv4Addr, port: u16) -> Self {
        Self {
            target: SocketAddrV4::new(broadcast.into(), port),
        }
    }

    pub fn target(&self) -> SocketAddrV4 {
        self.target
    }

    fn network_error(&self, source: io::Error) -> WakeError {
        WakeError::Network {
            target: self.target,
            source,
        }
    }
}

impl WakeSender for UdpBroadcaster {
    fn send(&mut self, packet: &MagicPacket) -> Result<(), WakeError> {
        let socket = UdpSocket::bind(SocketAddrV4::new(net::Ipv4Addr::UNSPECIFIED, 0))
            .map_err(|err| self.network_error(err))?;
        socket
            .set_broadcast(true)
            .map_err(|err| self.network_error(err))?;

        let sent = socket
            .send_to(packet.as_bytes(), self.target)
            .map_err(|err| self.network_error(err))?;
        if sent != MAGIC_PACKET_LEN {
            return Err(self.network_error(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short send: {sent} of {MAGIC_PACKET_LEN} bytes"),
            )));
        }

        debug!(
            target_mac = %packet.target(),
            to = %self.target,
            "magic packet sent"
        );
        Ok(())
    }
}

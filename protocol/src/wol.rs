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

//! Wake-on-LAN magic packet.

use crate::mac::MacAddr;
use static_assertions::const_assert;

const SYNC_LEN: usize = 6;
const MAC_REPETITIONS: usize = 16;

/// Size of the magic packet payload carried in the UDP datagram.
pub const MAGIC_PACKET_LEN: usize = 102;
const_assert!(SYNC_LEN + MAC_REPETITIONS * MacAddr::LEN == MAGIC_PACKET_LEN);

/// Default UDP port for magic packets (discard service).
pub const WOL_PORT: u16 = 9;

/// Six 0xFF bytes followed by sixteen copies of the target MAC.
#[derive(Clone, PartialEq, Eq)]
pub struct MagicPacket {
    target: MacAddr,
    bytes: [u8; MAGIC_PACKET_LEN],
}

impl MagicPacket {
    pub fn build(target: MacAddr) -> Self {
        let mut bytes = [0xFFu8; MAGIC_PACKET_LEN];
        for chunk in bytes[SYNC_LEN..].chunks_exact_mut(MacAddr::LEN) {
            chunk.copy_from_slice(target.as_bytes());
        }
        Self { target, bytes }
    }

    pub fn target(&self) -> MacAddr {
        self.target
    }

    pub fn as_bytes(&self) -> &[u8; MAGIC_PACKET_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for MagicPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagicPacket")
            .field("target", &self.target)
            .field("len", &MAGIC_PACKET_LEN)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_layout(mac: MacAddr) {
        let packet = MagicPacket::build(mac);
        let bytes = packet.as_bytes();
        assert_eq!(bytes.len(), 102);
        assert_eq!(&bytes[0..6], &[0xFF; 6]);
        for i in 0..16 {
            assert_eq!(&bytes[6 + 6 * i..12 + 6 * i], mac.as_bytes(), "copy {i}");
        }
    }

    #[test]
    fn layout_for_common_addresses() {
        assert_layout(MacAddr::from_raw([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]));
        assert_layout(MacAddr::from_raw([0xd0, 0x11, 0xe5, 0x13, 0xaf, 0x1f]));
    }

    #[test]
    fn layout_for_edge_addresses() {
        assert_layout(MacAddr::zero());
        assert_layout(MacAddr::broadcast());
    }

    #[test]
    fn remembers_target() {
        let mac = MacAddr::from_raw([1, 2, 3, 4, 5, 6]);
        assert_eq!(MagicPacket::build(mac).target(), mac);
    }
}

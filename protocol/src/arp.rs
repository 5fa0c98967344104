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

use crate::error::ArpParseError;
use crate::ipv4::Ipv4Addr;
use crate::mac::MacAddr;

/// arp parameters
pub const ARP_FIXED_LEN: usize = 28;
pub const HW_TYPE_ETHERNET: u16 = 0x0001;
pub const PROTO_TYPE_IPV4: u16 = 0x0800;

/// Supported ARP operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArpOperation {
    Request,
    Reply,
    Unknown(u16),
}

impl ArpOperation {
    pub fn opcode(self) -> u16 {
        match self {
            Self::Request => 1,
            Self::Reply => 2,
            Self::Unknown(code) => code,
        }
    }

    pub fn parse(opcode: u16) -> Self {
        match opcode {
            1 => Self::Request,
            2 => Self::Reply,
            other => Self::Unknown(other),
        }
    }
}

impl std::fmt::Display for ArpOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request => write!(f, "Request"),
            Self::Reply => write!(f, "Reply"),
            Self::Unknown(code) => write!(f, "Unknown ({code})"),
        }
    }
}

/// Ethernet/IPv4 ARP body. Only built for hardware type 1 and protocol 0x0800.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpPacket {
    pub operation: ArpOperation,
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_mac: MacAddr,
    pub target_ip: Ipv4Addr,
}

impl ArpPacket {
    pub fn new(
        operation: ArpOperation,
        sender_mac: MacAddr,
        sender_ip: Ipv4Addr,
        target_mac: MacAddr,
        target_ip: Ipv4Addr,
    ) -> Self {
        Self {
            operation,
            sender_mac,
            sender_ip,
            target_mac,
            target_ip,
        }
    }

    /// Decodes the 28 byte body that follows the Ethernet header. Anything
    /// past the fixed body (link-layer padding) is ignored.
    pub fn parse(payload: &[u8]) -> Result<Self, ArpParseError> {
        if payload.len() < ARP_FIXED_LEN {
            return Err(ArpParseError::Truncated { len: payload.len() });
        }
        let hardware_type = u16::from_be_bytes([payload[0], payload[1]]);
        let protocol_type = u16::from_be_bytes([payload[2], payload[3]]);
        if hardware_type != HW_TYPE_ETHERNET || protocol_type != PROTO_TYPE_IPV4 {
            return Err(ArpParseError::UnsupportedType {
                hardware_type,
                protocol_type,
            });
        }

        let hardware_len = payload[4];
        let protocol_len = payload[5];
        if hardware_len as usize != MacAddr::LEN {
            return Err(ArpParseError::InvalidHardwareLength(hardware_len));
        } else if protocol_len as usize != Ipv4Addr::LEN {
            return Err(ArpParseError::InvalidProtocolLength(protocol_len));
        }

        let opcode = u16::from_be_bytes([payload[6], payload[7]]);
        let sender_mac = MacAddr::from_slice(&payload[8..14]);
        let sender_ip = Ipv4Addr::new(payload[14], payload[15], payload[16], payload[17]);
        let target_mac = MacAddr::from_slice(&payload[18..24]);
        let target_ip = Ipv4Addr::new(payload[24], payload[25], payload[26], payload[27]);

        Ok(Self {
            operation: ArpOperation::parse(opcode),
            sender_mac,
            sender_ip,
            target_mac,
            target_ip,
        })
    }

    pub fn is_request(&self) -> bool {
        self.operation == ArpOperation::Request
    }

    pub fn to_bytes(&self) -> [u8; ARP_FIXED_LEN] {
        let mut bytes = [0u8; ARP_FIXED_LEN];
        bytes[0..2].copy_from_slice(&HW_TYPE_ETHERNET.to_be_bytes());
        bytes[2..4].copy_from_slice(&PROTO_TYPE_IPV4.to_be_bytes());
        bytes[4] = MacAddr::LEN as u8;
        bytes[5] = Ipv4Addr::LEN as u8;
        bytes[6..8].copy_from_slice(&self.operation.opcode().to_be_bytes());
        bytes[8..14].copy_from_slice(self.sender_mac.as_bytes());
        bytes[14..18].copy_from_slice(&self.sender_ip.octets());
        bytes[18..24].copy_from_slice(self.target_mac.as_bytes());
        bytes[24..28].copy_from_slice(&self.target_ip.octets());

        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // who-has 10.0.0.9 tell 10.0.0.5, as captured off the wire
    const REQUEST: [u8; ARP_FIXED_LEN] = [
        0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, // hw, proto, lens, opcode
        0x02, 0x11, 0x22, 0x33, 0x44, 0x55, 10, 0, 0, 5, // sender
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 10, 0, 0, 9, // target
    ];

    #[test]
    fn decodes_request_fields() {
        let packet = ArpPacket::parse(&REQUEST).unwrap();
        assert_eq!(packet.operation, ArpOperation::Request);
        assert_eq!(
            packet.sender_mac,
            MacAddr::from_raw([0x02, 0x11, 0x22, 0x33, 0x44, 0x55])
        );
        assert_eq!(packet.sender_ip, Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(packet.target_mac, MacAddr::zero());
        assert_eq!(packet.target_ip, Ipv4Addr::new(10, 0, 0, 9));
        assert_eq!(packet.to_bytes(), REQUEST);
    }

    #[test]
    fn decodes_reply_with_trailing_padding() {
        let reply = ArpPacket::new(
            ArpOperation::Reply,
            MacAddr::from_raw([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]),
            Ipv4Addr::new(10, 0, 0, 9),
            MacAddr::from_raw([0x02, 0x11, 0x22, 0x33, 0x44, 0x55]),
            Ipv4Addr::new(10, 0, 0, 5),
        );
        let mut bytes = reply.to_bytes().to_vec();
        bytes.resize(46, 0);
        assert_eq!(ArpPacket::parse(&bytes).unwrap(), reply);
    }

    #[test]
    fn keeps_unknown_opcodes() {
        let mut bytes = REQUEST;
        bytes[7] = 9;
        let packet = ArpPacket::parse(&bytes).unwrap();
        assert_eq!(packet.operation, ArpOperation::Unknown(9));
        assert!(!packet.is_request());
    }

    #[test]
    fn truncated_body_is_rejected() {
        assert_eq!(
            ArpPacket::parse(&REQUEST[..27]),
            Err(ArpParseError::Truncated { len: 27 })
        );
    }

    #[test]
    fn non_ethernet_hardware_is_unsupported() {
        let mut bytes = REQUEST;
        bytes[1] = 0x06; // IEEE 802
        let err = ArpPacket::parse(&bytes).unwrap_err();
        assert!(err.is_unsupported_type());
        assert_eq!(
            err,
            ArpParseError::UnsupportedType {
                hardware_type: 0x0006,
                protocol_type: 0x0800,
            }
        );
    }

    #[test]
    fn non_ipv4_protocol_is_unsupported() {
        let mut bytes = REQUEST;
        bytes[2] = 0x86;
        bytes[3] = 0xDD;
        assert!(ArpPacket::parse(&bytes).unwrap_err().is_unsupported_type());
    }

    #[test]
    fn odd_address_lengths_are_rejected() {
        let mut bytes = REQUEST;
        bytes[4] = 8;
        assert_eq!(
            ArpPacket::parse(&bytes),
            Err(ArpParseError::InvalidHardwareLength(8))
        );

        let mut bytes = REQUEST;
        bytes[5] = 16;
        assert_eq!(
            ArpPacket::parse(&bytes),
            Err(ArpParseError::InvalidProtocolLength(16))
        );
    }
}

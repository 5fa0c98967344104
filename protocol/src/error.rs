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

use std::borrow::Cow;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Ipv4ParseError {
    #[error("IPv4 address format error, should be: a.b.c.d")]
    InvalidFormat,
    #[error("IPv4 address num range error, should be in 0-255")]
    InvalidOctet,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MacParseError(pub Cow<'static, str>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EthernetParseError {
    #[error("frame of {len} bytes is too short to contain an Ethernet header")]
    PacketTooShort { len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArpParseError {
    #[error("ARP payload of {len} bytes is shorter than the fixed 28 byte body")]
    Truncated { len: usize },
    #[error(
        "unsupported ARP hardware/protocol pair (hw=0x{hardware_type:04x}, proto=0x{protocol_type:04x})"
    )]
    UnsupportedType {
        hardware_type: u16,
        protocol_type: u16,
    },
    #[error("unsupported ARP hardware address length {0}")]
    InvalidHardwareLength(u8),
    #[error("unsupported ARP protocol address length {0}")]
    InvalidProtocolLength(u8),
}

impl ArpParseError {
    /// True when the frame is well formed but not Ethernet/IPv4 ARP.
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. })
    }
}

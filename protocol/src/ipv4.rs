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

use crate::error::Ipv4ParseError;
use std::fmt;
use std::net;
use std::str::FromStr;

/// Fixed-width IPv4 address as it appears on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ipv4Addr([u8; 4]);

impl Ipv4Addr {
    pub const LEN: usize = 4;

    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self([a, b, c, d])
    }

    pub const fn octets(&self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for Ipv4Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl FromStr for Ipv4Addr {
    type Err = Ipv4ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 4 {
            return Err(Ipv4ParseError::InvalidFormat);
        }

        let mut octets = [0u8; 4];
        for (i, part) in parts.iter().enumerate() {
            // `u8::from_str` would also take a leading '+'
            if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Ipv4ParseError::InvalidFormat);
            }
            octets[i] = part.parse().map_err(|_| Ipv4ParseError::InvalidOctet)?;
        }

        Ok(Self(octets))
    }
}

impl From<net::Ipv4Addr> for Ipv4Addr {
    fn from(addr: net::Ipv4Addr) -> Self {
        Self(addr.octets())
    }
}

impl From<Ipv4Addr> for net::Ipv4Addr {
    fn from(addr: Ipv4Addr) -> Self {
        net::Ipv4Addr::from(addr.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_decimal() {
        let addr: Ipv4Addr = "10.0.0.5".parse().unwrap();
        assert_eq!(addr.octets(), [10, 0, 0, 5]);
        assert_eq!(addr.to_string(), "10.0.0.5");
    }

    #[test]
    fn rejects_wrong_shape() {
        assert_eq!(
            "10.0.0".parse::<Ipv4Addr>(),
            Err(Ipv4ParseError::InvalidFormat)
        );
        assert_eq!(
            "10.0.0.5.1".parse::<Ipv4Addr>(),
            Err(Ipv4ParseError::InvalidFormat)
        );
        assert_eq!(
            "10..0.5".parse::<Ipv4Addr>(),
            Err(Ipv4ParseError::InvalidFormat)
        );
        assert_eq!(
            "10.+1.0.5".parse::<Ipv4Addr>(),
            Err(Ipv4ParseError::InvalidFormat)
        );
        assert_eq!(
            "ten.0.0.5".parse::<Ipv4Addr>(),
            Err(Ipv4ParseError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_out_of_range_octet() {
        assert_eq!(
            "10.0.0.256".parse::<Ipv4Addr>(),
            Err(Ipv4ParseError::InvalidOctet)
        );
    }

    #[test]
    fn converts_to_and_from_std() {
        let std_addr = net::Ipv4Addr::new(192, 168, 1, 255);
        let addr = Ipv4Addr::from(std_addr);
        assert_eq!(addr, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(net::Ipv4Addr::from(addr), std_addr);
    }
}

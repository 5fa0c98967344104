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
use std::net::SocketAddrV4;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WakeError {
    /// Missing or malformed watch parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("interface '{name}' not found or has no IPv4 address: {reason}")]
    InterfaceNotFound { name: String, reason: String },

    #[error("failed to open capture on '{interface}': {source}")]
    SocketOpen {
        interface: String,
        #[source]
        source: pcap::Error,
    },

    #[error("capture on '{interface}' is not Ethernet: {reason}")]
    UnsupportedLink { interface: String, reason: String },

    #[error("failed to receive frames: {reason}")]
    Capture { reason: String },

    #[error("failed to broadcast magic packet to {target}: {source}")]
    Network {
        target: SocketAddrV4,
        #[source]
        source: io::Error,
    },

    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl WakeError {
    /// Whether the watcher has to stop. A lost wake is only reported.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WakeError::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn only_send_failures_are_recoverable() {
        let send = WakeError::Network {
            target: SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 255), 9),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!send.is_fatal());

        assert!(WakeError::Configuration("bad".into()).is_fatal());
        assert!(
            WakeError::InterfaceNotFound {
                name: "eth9".into(),
                reason: "no such device".into(),
            }
            .is_fatal()
        );
        assert!(
            WakeError::UnsupportedLink {
                interface: "any".into(),
                reason: "link type 113".into(),
            }
            .is_fatal()
        );
        assert!(
            WakeError::Capture {
                reason: "network is down".into(),
            }
            .is_fatal()
        );
    }

    #[test]
    fn messages_name_the_culprit() {
        let err = WakeError::Network {
            target: SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 255), 9),
            source: io::Error::new(io::ErrorKind::Other, "unreachable"),
        };
        let msg = err.to_string();
        assert!(msg.contains("10.0.0.255:9"));
        assert!(msg.contains("unreachable"));
    }
}

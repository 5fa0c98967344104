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

use protocol::arp::ArpPacket;
use protocol::ipv4::Ipv4Addr;
use tracing::{info, warn};

use crate::broadcast::WakeSender;
use crate::context::WakeContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Ignored,
    WakeSent,
    WakeFailed,
}

/// The local host itself is asking who has the watched device. Third-party
/// ARP traffic for the device never matches.
pub fn evaluate(packet: &ArpPacket, local_ip: Ipv4Addr, watched_ip: Ipv4Addr) -> bool {
    packet.is_request() && packet.sender_ip == local_ip && packet.target_ip == watched_ip
}

/// Sends the prebuilt magic packet when `packet` matches. Send failures are
/// logged and dropped, no retry.
pub fn fire<S>(ctx: &WakeContext, packet: &ArpPacket, sender: &mut S) -> TriggerOutcome
where
    S: WakeSender + ?Sized,
{
    if !evaluate(packet, ctx.local_ip(), ctx.watched_ip()) {
        return TriggerOutcome::Ignored;
    }

    match sender.send(ctx.magic_packet()) {
        Ok(()) => {
            info!(
                device_ip = %ctx.watched_ip(),
                device_mac = %ctx.config().device_mac,
                "sent magic packet"
            );
            TriggerOutcome::WakeSent
        }
        Err(err) => {
            warn!(device_ip = %ctx.watched_ip(), "wake attempt lost: {err}");
            TriggerOutcome::WakeFailed
        }
    }
}

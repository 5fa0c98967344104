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

//! Watches ARP traffic on one interface and broadcasts a Wake-on-LAN magic
//! packet the moment this host asks where the watched device is.

pub mod broadcast;
pub mod capture;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod interface;
pub mod logging;
pub mod trigger;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::broadcast::UdpBroadcaster;
use crate::capture::{install_shutdown_handler, CaptureLoop, CaptureStats, PcapSource};
use crate::cli::WatchArgs;
use crate::config::load_config;
use crate::context::WakeContext;
use crate::interface::resolve_local_ip;

/// Validates the configuration, resolves the local address, then captures
/// until SIGINT/SIGTERM. Nothing is opened if the configuration is invalid.
pub fn watch(args: &WatchArgs) -> Result<CaptureStats> {
    let config = load_config(args)?;
    let local_ip = resolve_local_ip(&config.interface)?;
    info!(
        interface = %config.interface,
        local_ip = %local_ip,
        device_ip = %config.device_ip,
        device_mac = %config.device_mac,
        broadcast = %config.broadcast,
        "starting arp-wake"
    );

    let ctx = WakeContext::new(config, local_ip);
    let sender = UdpBroadcaster::new(ctx.config().broadcast, ctx.config().port);
    let source = PcapSource::open(&ctx.config().interface, args.timeout_ms)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    install_shutdown_handler(Arc::clone(&shutdown))?;

    let mut capture = CaptureLoop::new(ctx, source, sender, shutdown);
    capture.run().context("watch loop aborted")
}

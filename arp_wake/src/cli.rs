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

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use protocol::wol::WOL_PORT;

#[derive(Parser)]
#[command(
    name = "arp-wake",
    version,
    about = "Wake a sleeping LAN host as soon as this machine asks for it via ARP"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List interfaces libpcap can open, with their IPv4 addresses
    List,
    /// Watch ARP traffic and broadcast a magic packet when the device is asked for
    Watch(WatchArgs),
}

#[derive(Args, Clone, Debug)]
pub struct WatchArgs {
    /// IP address of the device to wake up
    #[arg(short, long, value_name = "IPv4")]
    pub ip: Option<String>,
    /// MAC (hardware) address of the device to wake up
    #[arg(short, long, value_name = "MAC")]
    pub mac: Option<String>,
    /// Network device to watch traffic on (e.g. eth0)
    #[arg(short, long, value_name = "IFACE")]
    pub device: Option<String>,
    /// Broadcast IP address (e.g. 192.168.1.255)
    #[arg(short, long, value_name = "IPv4")]
    pub broadcast: Option<String>,
    /// Config file with ip=, mac=, device= and broadcast= lines; flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// UDP port the magic packet is sent to
    #[arg(long, default_value_t = WOL_PORT)]
    pub port: u16,
    /// How long one receive may block before the shutdown flag is checked (ms)
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(i32).range(1..))]
    pub timeout_ms: i32,
    /// Log every ARP frame that is seen
    #[arg(long)]
    pub debug: bool,
}

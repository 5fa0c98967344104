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

use anyhow::Result;
use clap::Parser;

use arp_wake::cli::{Cli, Command};
use arp_wake::interface::list_adapters;
use arp_wake::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::List => list_adapters(),
        Command::Watch(args) => {
            init_logging(args.debug)?;
            arp_wake::watch(&args).map(|_| ())
        }
    }
}

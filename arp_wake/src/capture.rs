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

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pcap::{Active, Capture, Error as PcapError, Linktype};
use protocol::arp::ArpPacket;
use protocol::ethernet::EthernetFrame;
use tracing::{debug, error, info, warn};

use crate::broadcast::WakeSender;
use crate::context::WakeContext;
use crate::error::WakeError;
use crate::trigger::{self, TriggerOutcome};

/// Largest frame the capture handle hands back.
pub const SNAPLEN: i32 = 65536;

/// Kernel-side filter; user space still copes with any ethertype.
const CAPTURE_FILTER: &str = "arp";

/// Yields raw Ethernet frames. `Ok(None)` means the poll interval passed
/// without traffic.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<&[u8]>, WakeError>;
}

/// Live capture on one interface through libpcap.
pub struct PcapSource {
    capture: Capture<Active>,
}

impl PcapSource {
    /// `timeout_ms` bounds how long a receive blocks, which is how quickly a
    /// shutdown request is noticed.
    pub fn open(interface: &str, timeout_ms: i32) -> Result<Self, WakeError> {
        let open_error = |source: PcapError| WakeError::SocketOpen {
            interface: interface.to_string(),
            source,
        };

        let mut capture = Capture::from_device(interface)
            .map_err(open_error)?
            .promisc(false)
            .snaplen(SNAPLEN)
            .immediate_mode(true)
            .timeout(timeout_ms)
            .open()
            .map_err(open_error)?;
        ensure_ethernet(interface, capture.get_datalink())?;
        capture.filter(CAPTURE_FILTER, true).map_err(open_error)?;

        Ok(Self { capture })
    }
}

/// Frames are decoded from a 14 byte Ethernet header; cooked (`any`) or other
/// link layers would be misread.
fn ensure_ethernet(interface: &str, linktype: Linktype) -> Result<(), WakeError> {
    if linktype == Linktype::ETHERNET {
        return Ok(());
    }
    Err(WakeError::UnsupportedLink {
        interface: interface.to_string(),
        reason: format!("link type {}", linktype.0),
    })
}

impl FrameSource for PcapSource {
    fn next_frame(&mut self) -> Result<Option<&[u8]>, WakeError> {
        match self.capture.next_packet() {
            Ok(packet) => Ok(Some(packet.data)),
            Err(PcapError::TimeoutExpired) => Ok(None),
            Err(err) => Err(WakeError::Capture {
                reason: err.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Initializing,
    Running,
    Draining,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Valid Ethernet frame that is not ARP.
    NotArp,
    /// Truncated frame or an ARP body we do not interpret.
    Discarded,
    Arp(TriggerOutcome),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames: u64,
    pub arp_frames: u64,
    pub discarded: u64,
    pub wakes_sent: u64,
    pub wakes_failed: u64,
}

impl CaptureStats {
    fn record(&mut self, outcome: FrameOutcome) {
        self.frames += 1;
        match outcome {
            FrameOutcome::NotArp => {}
            FrameOutcome::Discarded => self.discarded += 1,
            FrameOutcome::Arp(trigger) => {
                self.arp_frames += 1;
                match trigger {
                    TriggerOutcome::Ignored => {}
                    TriggerOutcome::WakeSent => self.wakes_sent += 1,
                    TriggerOutcome::WakeFailed => self.wakes_failed += 1,
                }
            }
        }
    }
}

/// Decodes one frame and runs the trigger on it. Bad frames are dropped here
/// and never escalate.
pub fn process_frame<S>(ctx: &WakeContext, frame: &[u8], sender: &mut S) -> FrameOutcome
where
    S: WakeSender + ?Sized,
{
    let frame = match EthernetFrame::parse(frame) {
        Ok(frame) => frame,
        Err(err) => {
            debug!("discarding frame: {err}");
            return FrameOutcome::Discarded;
        }
    };

    let Some(payload) = frame.arp_payload() else {
        return FrameOutcome::NotArp;
    };

    let packet = match ArpPacket::parse(payload) {
        Ok(packet) => packet,
        Err(err) if err.is_unsupported_type() => {
            debug!(src = %frame.header.src, "skipping ARP frame: {err}");
            return FrameOutcome::Discarded;
        }
        Err(err) => {
            warn!(src = %frame.header.src, "malformed ARP frame: {err}");
            return FrameOutcome::Discarded;
        }
    };

    debug!(
        op = %packet.operation,
        sender = %packet.sender_ip,
        target = %packet.target_ip,
        "ARP"
    );
    FrameOutcome::Arp(trigger::fire(ctx, &packet, sender))
}

/// Single-threaded receive loop. Owns the capture source until it stops.
pub struct CaptureLoop<F, S> {
    ctx: WakeContext,
    source: Option<F>,
    sender: S,
    shutdown: Arc<AtomicBool>,
    state: CaptureState,
    stats: CaptureStats,
}

impl<F, S> CaptureLoop<F, S>
where
    F: FrameSource,
    S: WakeSender,
{
    pub fn new(ctx: WakeContext, source: F, sender: S, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            ctx,
            source: Some(source),
            sender,
            shutdown,
            state: CaptureState::Initializing,
            stats: CaptureStats::default(),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Runs until the shutdown flag is raised (`Ok`) or a receive fails
    /// (`Err`). Either way the source is released and the loop ends `Stopped`.
    pub fn run(&mut self) -> Result<CaptureStats, WakeError> {
        let Some(source) = self.source.as_mut() else {
            return Err(WakeError::Capture {
                reason: "capture loop already stopped".to_string(),
            });
        };

        self.state = CaptureState::Running;
        info!(
            interface = %self.ctx.config().interface,
            local_ip = %self.ctx.local_ip(),
            device_ip = %self.ctx.watched_ip(),
            "watching for ARP requests"
        );

        let result = loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break Ok(());
            }
            match source.next_frame() {
                Ok(Some(frame)) => {
                    let outcome = process_frame(&self.ctx, frame, &mut self.sender);
                    self.stats.record(outcome);
                }
                Ok(None) => {}
                Err(err) if !err.is_fatal() => warn!("receive hiccup: {err}"),
                Err(err) => break Err(err),
            }
        };

        match result {
            Ok(()) => {
                self.state = CaptureState::Draining;
                debug!("shutdown requested, releasing capture");
                self.source = None;
                self.state = CaptureState::Stopped;
                info!(
                    frames = self.stats.frames,
                    arp = self.stats.arp_frames,
                    discarded = self.stats.discarded,
                    wakes = self.stats.wakes_sent,
                    failed = self.stats.wakes_failed,
                    "capture stopped"
                );
                Ok(self.stats)
            }
            Err(err) => {
                error!("capture failed: {err}");
                self.source = None;
                self.state = CaptureState::Stopped;
                Err(err)
            }
        }
    }
}

/// Raises `shutdown` on SIGINT or SIGTERM.
pub fn install_shutdown_handler(shutdown: Arc<AtomicBool>) -> Result<(), WakeError> {
    ctrlc::set_handler(move || {
        if shutdown.swap(true, Ordering::SeqCst) {
            warn!("second shutdown signal received, still stopping");
        } else {
            info!("shutdown signal received");
        }
    })?;
    Ok(())
}

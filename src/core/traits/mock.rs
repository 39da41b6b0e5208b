//! Mock collaborator implementations for testing
//!
//! This module provides mock implementations of the collaborator traits that
//! can be used for unit testing without a vehicle behind the link.
//!
//! # Feature Gate
//!
//! Available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled

#![cfg(any(test, feature = "mock"))]

use heapless::{String, Vec};

use super::{
    Autopilot, ConfigStorage, DataLog, Gnss, LinkWatchdog, MotorSimulator, PositionEstimator,
    ReplySink, Services, Terminal, VehicleExtension,
};
use crate::communication::link::codec::MAX_FRAME_LEN;
use crate::core::config::VehicleConfig;
use crate::core::route::RoutePoint;

const MAX_FRAMES: usize = 8;
const MAX_ROUTE: usize = 64;

/// Reply sink that records every frame it is given.
#[derive(Default)]
pub struct RecordingSink {
    pub frames: Vec<Vec<u8, MAX_FRAME_LEN>, MAX_FRAMES>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&[u8]> {
        self.frames.last().map(|f| f.as_slice())
    }
}

impl ReplySink for RecordingSink {
    fn send(&mut self, frame: &[u8]) {
        let mut copy = Vec::new();
        copy.extend_from_slice(frame)
            .expect("frame exceeds MAX_FRAME_LEN");
        self.frames.push(copy).expect("too many recorded frames");
    }
}

/// Route buffer with a configurable capacity, rejecting appends beyond it.
pub struct MockAutopilot {
    pub route: Vec<RoutePoint, MAX_ROUTE>,
    pub capacity: usize,
    pub accept_replace: bool,
    pub active: bool,
    pub resets: u32,
    pub sync_calls: Vec<(i32, i32, i32), 8>,
}

impl Default for MockAutopilot {
    fn default() -> Self {
        Self {
            route: Vec::new(),
            capacity: MAX_ROUTE,
            accept_replace: true,
            active: false,
            resets: 0,
            sync_calls: Vec::new(),
        }
    }
}

impl Autopilot for MockAutopilot {
    fn add_point(&mut self, point: &RoutePoint, _first: bool) -> bool {
        if self.route.len() >= self.capacity {
            return false;
        }
        self.route.push(*point).is_ok()
    }

    fn replace_route(&mut self, point: &RoutePoint) -> bool {
        if !self.accept_replace {
            return false;
        }
        self.route.clear();
        self.route.push(*point).is_ok()
    }

    fn remove_last_point(&mut self) {
        self.route.pop();
    }

    fn clear_route(&mut self) {
        self.route.clear();
    }

    fn route_len(&self) -> usize {
        self.route.len()
    }

    fn route_point(&self, index: i32) -> RoutePoint {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.route.get(i))
            .copied()
            .unwrap_or_default()
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn reset_state(&mut self) {
        self.resets += 1;
    }

    fn sync_point(&mut self, point: i32, time_ms: i32, min_diff_ms: i32) {
        let _ = self.sync_calls.push((point, time_ms, min_diff_ms));
    }
}

#[derive(Default)]
pub struct MockPositionEstimator {
    pub position: Option<(f32, f32, f32)>,
    pub yaw_offset: Option<f32>,
}

impl PositionEstimator for MockPositionEstimator {
    fn set_position(&mut self, x: f32, y: f32, yaw: f32) {
        self.position = Some((x, y, yaw));
    }

    fn set_yaw_offset(&mut self, yaw: f32) {
        self.yaw_offset = Some(yaw);
    }
}

#[derive(Default)]
pub struct MockGnss {
    pub enu_ref: (f64, f64, f32),
    pub enu_ref_sets: u32,
    pub rtcm: Vec<u8, 512>,
}

impl Gnss for MockGnss {
    fn set_enu_ref(&mut self, lat: f64, lon: f64, height: f32) {
        self.enu_ref = (lat, lon, height);
        self.enu_ref_sets += 1;
    }

    fn enu_ref(&self) -> (f64, f64, f32) {
        self.enu_ref
    }

    fn input_rtcm(&mut self, data: &[u8]) {
        let _ = self.rtcm.extend_from_slice(data);
    }
}

#[derive(Default)]
pub struct MockDataLog {
    pub rate_hz: i16,
    pub enabled: bool,
    pub name: String<32>,
    pub updates: u32,
}

impl DataLog for MockDataLog {
    fn set_rate_hz(&mut self, rate: i16) {
        self.rate_hz = rate;
        self.updates += 1;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_name(&mut self, name: &str) {
        self.name.clear();
        let _ = self.name.push_str(name);
    }
}

#[derive(Default)]
pub struct MockMotorSimulator {
    pub running: bool,
}

impl MotorSimulator for MockMotorSimulator {
    fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}

#[derive(Default)]
pub struct MockConfigStorage {
    pub stored: Option<VehicleConfig>,
    pub defaults: VehicleConfig,
}

impl ConfigStorage for MockConfigStorage {
    fn store(&mut self, config: &VehicleConfig) {
        self.stored = Some(config.clone());
    }

    fn default_config(&self) -> VehicleConfig {
        self.defaults.clone()
    }
}

#[derive(Default)]
pub struct MockTerminal {
    pub lines: Vec<String<128>, 4>,
}

impl Terminal for MockTerminal {
    fn process_line(&mut self, line: &str, _reply: &mut dyn ReplySink) {
        let mut copy = String::new();
        let _ = copy.push_str(line);
        let _ = self.lines.push(copy);
    }
}

#[derive(Default)]
pub struct MockWatchdog {
    pub resets: u32,
}

impl LinkWatchdog for MockWatchdog {
    fn reset(&mut self) {
        self.resets += 1;
    }
}

/// Records every packet forwarded past the general command table.
#[derive(Default)]
pub struct MockExtension {
    /// (command id, payload length, reply id) per forwarded packet.
    pub calls: Vec<(u8, usize, u8), 16>,
}

impl VehicleExtension for MockExtension {
    fn process(&mut self, command: u8, payload: &[u8], reply_id: u8, _reply: &mut dyn ReplySink) {
        let _ = self.calls.push((command, payload.len(), reply_id));
    }
}

/// All mocks in one place, with a [`Services`] view over them.
#[derive(Default)]
pub struct MockServices {
    pub autopilot: MockAutopilot,
    pub position: MockPositionEstimator,
    pub gnss: MockGnss,
    pub log: MockDataLog,
    pub motor_sim: MockMotorSimulator,
    pub storage: MockConfigStorage,
    pub terminal: MockTerminal,
    pub watchdog: MockWatchdog,
    pub extension: MockExtension,
}

impl MockServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn services(&mut self) -> Services<'_> {
        Services {
            autopilot: &mut self.autopilot,
            position: &mut self.position,
            gnss: &mut self.gnss,
            log: &mut self.log,
            motor_sim: &mut self.motor_sim,
            storage: &mut self.storage,
            terminal: &mut self.terminal,
            watchdog: &mut self.watchdog,
            extension: &mut self.extension,
        }
    }
}

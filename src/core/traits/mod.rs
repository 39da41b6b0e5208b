//! Collaborator traits
//!
//! The protocol core owns nothing but the live configuration record. Every
//! other subsystem it touches (autopilot route buffer, position estimator,
//! GNSS receiver, data log, configuration storage, terminal interpreter) is
//! reached through one of these traits, so the core can be exercised on a
//! host without any vehicle hardware behind it.
//!
//! All calls are synchronous and must not block; `process()` runs to
//! completion on a single call stack and no two packets are dispatched
//! concurrently on one node.

use crate::core::config::VehicleConfig;
use crate::core::route::RoutePoint;

pub mod mock;

/// Outbound channel for reply packets.
///
/// The transport layer supplies one per received packet so replies always go
/// back to whoever sent the request. It is threaded through every call as an
/// explicit parameter; there is no process-wide send function.
pub trait ReplySink {
    /// Send one complete packet (receiver id, command id, payload).
    fn send(&mut self, frame: &[u8]);
}

/// Autopilot route buffer and path-follow state.
pub trait Autopilot {
    /// Offer one point for appending. `first` marks the first point of a
    /// batch. Returns false when the point is rejected (buffer full or
    /// index conflict); the caller stops the batch there.
    fn add_point(&mut self, point: &RoutePoint, first: bool) -> bool;

    /// Replace the whole route with a single starting point. Returns false
    /// when the autopilot refuses the replacement.
    fn replace_route(&mut self, point: &RoutePoint) -> bool;

    fn remove_last_point(&mut self);

    fn clear_route(&mut self);

    fn route_len(&self) -> usize;

    /// Read the point at `index`. Out-of-range behavior is up to the
    /// implementation; the protocol forwards indices as received.
    fn route_point(&self, index: i32) -> RoutePoint;

    fn set_active(&mut self, active: bool);

    /// Reset path-follow progress (current point, interpolation state).
    fn reset_state(&mut self);

    /// Reconcile route progress at `point` against an external time
    /// reference. A correction is applied only when the discrepancy exceeds
    /// `min_diff_ms`.
    fn sync_point(&mut self, point: i32, time_ms: i32, min_diff_ms: i32);
}

/// Position estimate in the local ENU plane.
pub trait PositionEstimator {
    fn set_position(&mut self, x: f32, y: f32, yaw: f32);

    fn set_yaw_offset(&mut self, yaw: f32);
}

/// GNSS/RTK receiver interface.
pub trait Gnss {
    /// Set the local tangent-plane origin used to map global coordinates
    /// into the ENU plane.
    fn set_enu_ref(&mut self, lat: f64, lon: f64, height: f32);

    fn enu_ref(&self) -> (f64, f64, f32);

    /// Forward a raw differential-correction stream to the receiver.
    fn input_rtcm(&mut self, data: &[u8]);
}

/// On-vehicle data log control.
pub trait DataLog {
    fn set_rate_hz(&mut self, rate: i16);

    fn set_enabled(&mut self, enabled: bool);

    fn set_name(&mut self, name: &str);
}

/// Motor simulation toggle, used on the bench without a drive stage.
pub trait MotorSimulator {
    fn set_running(&mut self, running: bool);
}

/// Persistent configuration storage.
pub trait ConfigStorage {
    fn store(&mut self, config: &VehicleConfig);

    /// Factory-default record, reported over the link on request.
    fn default_config(&self) -> VehicleConfig;
}

/// Line-oriented terminal interpreter.
pub trait Terminal {
    /// Interpret one command line. Replies, if any, are terminal-defined
    /// and go through the supplied sink.
    fn process_line(&mut self, line: &str, reply: &mut dyn ReplySink);
}

/// Link liveness watchdog, reset by heartbeats.
pub trait LinkWatchdog {
    fn reset(&mut self);
}

/// Vehicle-type-specific command extension.
///
/// Every packet that passes the address filter is forwarded here after the
/// general command table, including ids the table does not know, so one
/// packet can trigger class-specific behavior.
pub trait VehicleExtension {
    fn process(&mut self, command: u8, payload: &[u8], reply_id: u8, reply: &mut dyn ReplySink);
}

/// Bundle of collaborator references threaded through one dispatch call.
pub struct Services<'a> {
    pub autopilot: &'a mut dyn Autopilot,
    pub position: &'a mut dyn PositionEstimator,
    pub gnss: &'a mut dyn Gnss,
    pub log: &'a mut dyn DataLog,
    pub motor_sim: &'a mut dyn MotorSimulator,
    pub storage: &'a mut dyn ConfigStorage,
    pub terminal: &'a mut dyn Terminal,
    pub watchdog: &'a mut dyn LinkWatchdog,
    pub extension: &'a mut dyn VehicleExtension,
}

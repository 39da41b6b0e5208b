//! Route point value type
//!
//! A route is an ordered sequence of [`RoutePoint`] owned by the autopilot.
//! The sequence is never reordered and indices stay stable between mutations;
//! this crate only mutates it through [`crate::core::traits::Autopilot`].

/// One waypoint of the autopilot route.
///
/// Positions are metres in the local ENU plane, speed is m/s. `time_ms` is
/// the scheduled arrival time used for multi-vehicle synchronization, and
/// `attributes` is an opaque per-point bitmask interpreted by the autopilot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoutePoint {
    pub px: f32,
    pub py: f32,
    pub pz: f32,
    pub speed: f32,
    pub time_ms: i32,
    pub attributes: u32,
}

impl RoutePoint {
    pub const fn new(px: f32, py: f32, pz: f32, speed: f32) -> Self {
        Self {
            px,
            py,
            pz,
            speed,
            time_ms: 0,
            attributes: 0,
        }
    }
}

//! Addressed binary command protocol
//!
//! Wire format: `byte0 = receiver id`, `byte1 = command id`, remaining bytes
//! are the command payload. There is no length field; the transport layer
//! delivers exact packet boundaries.
//!
//! # Architecture
//!
//! - **codec**: bounds-checked cursors and fixed-point numeric encodings
//! - **command**: wire command ids and their dispatch-level classification
//! - **dispatcher**: address filtering and command-to-handler routing
//! - **handlers**: pose, route synchronization, and configuration handlers
//! - **telemetry**: outbound-only status, plot, and passthrough messages

pub mod codec;
pub mod command;
pub mod dispatcher;
pub mod handlers;
pub mod telemetry;

/// Receiver id addressing every controller on the link.
pub const ID_BROADCAST: u8 = 255;

/// Receiver id of the companion compute unit riding on the vehicle.
pub const ID_CAR_CLIENT: u8 = 254;

/// First byte of an RTCM3 differential-correction frame. Such frames belong
/// on the correction stream, not the command link; they are dropped with a
/// warning when they show up here.
pub const RTCM3_PREAMBLE: u8 = 0xD3;

/// Fixed-point scale for positions (px, py, pz, x, y) in metres.
pub const POS_SCALE: f32 = 1e4;

/// Fixed-point scale for speeds (m/s) and angles (radians).
pub const SPEED_SCALE: f32 = 1e6;
pub const ANGLE_SCALE: f32 = 1e6;

/// Fixed-point scale for geodetic latitude/longitude in degrees.
pub const LLH_SCALE: f64 = 1e16;

/// Fixed-point scale for the ENU reference height in metres.
pub const HEIGHT_SCALE: f32 = 1e3;

/// Immutable view of one received packet. Valid for a single dispatch call.
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    pub receiver: u8,
    pub command: u8,
    pub payload: &'a [u8],
}

impl<'a> Packet<'a> {
    /// Split a raw buffer into header and payload. Buffers shorter than the
    /// two header bytes carry no command and yield `None`.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let (&receiver, rest) = data.split_first()?;
        let (&command, payload) = rest.split_first()?;
        Some(Self {
            receiver,
            command,
            payload,
        })
    }
}

/// Resolve the id replies should carry for a packet addressed to `receiver`,
/// or `None` when the packet is not for this node.
///
/// Broadcast packets are answered with this node's own id; packets addressed
/// to the car client keep the car-client id so the companion unit can tell
/// its own traffic apart.
pub fn reply_id(own_id: u8, receiver: u8) -> Option<u8> {
    if receiver == own_id || receiver == ID_BROADCAST {
        Some(own_id)
    } else if receiver == ID_CAR_CLIENT {
        Some(ID_CAR_CLIENT)
    } else {
        None
    }
}

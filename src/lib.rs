#![cfg_attr(not(test), no_std)]

//! rover_link - Communication core for an RTK ground-vehicle autopilot
//!
//! This library implements the addressed binary command protocol that lets a
//! control station, companion computer, or peer vehicle drive and configure
//! the vehicle controller over a serial or radio link. The transport layer
//! (framing, checksums, retransmission) hands complete packet buffers to
//! [`CommandDispatcher::process`] together with a reply sink; everything the
//! protocol touches beyond its own state is reached through the collaborator
//! traits in [`crate::core::traits`].

// Core systems: configuration record, route types, collaborator seams
pub mod core;

// Communication protocol: packet parsing, dispatch, codec, telemetry
pub mod communication;

pub use crate::communication::link::dispatcher::CommandDispatcher;
pub use crate::core::traits::{ReplySink, Services};

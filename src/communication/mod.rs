//! Communication protocols
//!
//! The `link` module implements the addressed binary command protocol spoken
//! over the radio and USB serial links. Transport framing lives outside this
//! crate; the link layer here starts at complete packet buffers.

pub mod link;

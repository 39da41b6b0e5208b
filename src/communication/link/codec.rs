//! Numeric wire codec
//!
//! Big-endian primitives plus fixed-point float encodings, read and written
//! through bounds-checked cursors. Every operation returns a [`CodecError`]
//! instead of touching memory outside the buffer it was given.
//!
//! # Fixed-point encodings
//!
//! Scaled floats travel as integers: `raw = round(value * scale)`, so the
//! round-trip error is bounded by `0.5 / scale`. The raw integer saturates at
//! the range limits of its width.
//!
//! # Adaptive encoding
//!
//! `f32_auto` trades message size for range at a fixed scale of `1e4`
//! (precision floor `0.5e-4`):
//!
//! - narrow form, 2 bytes: `raw` as `i16` when it fits and is not the
//!   sentinel, covering |value| <= 3.2767
//! - wide form, 6 bytes: the sentinel `i16::MIN` followed by `raw` as `i32`,
//!   covering |value| <= 214748.3647
//!
//! The narrow form can never produce the sentinel, so the first two bytes
//! are enough for the decoder to recover the width. Non-finite values encode
//! as zero.

use heapless::Vec;

/// Scale shared by every adaptive field.
const AUTO_SCALE: f64 = 1e4;

/// Largest payload a single packet may carry.
pub const MAX_PAYLOAD_LEN: usize = 1024;

/// Payload capacity plus the two header bytes.
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD_LEN + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Read past the end of the received payload.
    Underflow,
    /// Write past the frame capacity.
    Overflow,
}

/// Bounds-checked reading cursor over a received payload.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Everything not yet consumed, consuming it.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = &self.buf[self.pos..];
        self.pos = self.buf.len();
        rest
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::Underflow);
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_i16(&mut self) -> Result<i16, CodecError> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        let b = self.take(8)?;
        Ok(i64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// 32-bit fixed-point float with an explicit per-field scale.
    pub fn read_f32_scaled(&mut self, scale: f32) -> Result<f32, CodecError> {
        Ok((f64::from(self.read_i32()?) / f64::from(scale)) as f32)
    }

    /// 64-bit fixed-point double with an explicit per-field scale.
    pub fn read_f64_scaled(&mut self, scale: f64) -> Result<f64, CodecError> {
        Ok(self.read_i64()? as f64 / scale)
    }

    /// Adaptive-width float, see the module docs for the wire contract.
    pub fn read_f32_auto(&mut self) -> Result<f32, CodecError> {
        let head = self.read_i16()?;
        let raw = if head == i16::MIN {
            self.read_i32()?
        } else {
            i32::from(head)
        };
        Ok((f64::from(raw) / AUTO_SCALE) as f32)
    }
}

/// Bounded writing cursor for one outbound frame.
pub struct PacketWriter {
    buf: Vec<u8, MAX_FRAME_LEN>,
}

impl PacketWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), CodecError> {
        self.buf.push(v).map_err(|_| CodecError::Overflow)
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> Result<(), CodecError> {
        self.buf
            .extend_from_slice(v)
            .map_err(|_| CodecError::Overflow)
    }

    pub fn write_u16(&mut self, v: u16) -> Result<(), CodecError> {
        self.write_bytes(&v.to_be_bytes())
    }

    pub fn write_i16(&mut self, v: i16) -> Result<(), CodecError> {
        self.write_bytes(&v.to_be_bytes())
    }

    pub fn write_u32(&mut self, v: u32) -> Result<(), CodecError> {
        self.write_bytes(&v.to_be_bytes())
    }

    pub fn write_i32(&mut self, v: i32) -> Result<(), CodecError> {
        self.write_bytes(&v.to_be_bytes())
    }

    pub fn write_i64(&mut self, v: i64) -> Result<(), CodecError> {
        self.write_bytes(&v.to_be_bytes())
    }

    /// 32-bit fixed-point float with an explicit per-field scale.
    pub fn write_f32_scaled(&mut self, v: f32, scale: f32) -> Result<(), CodecError> {
        self.write_i32(scale_to_raw(f64::from(v), f64::from(scale), i32::MIN as i64, i32::MAX as i64) as i32)
    }

    /// 64-bit fixed-point double with an explicit per-field scale.
    pub fn write_f64_scaled(&mut self, v: f64, scale: f64) -> Result<(), CodecError> {
        self.write_i64(scale_to_raw(v, scale, i64::MIN, i64::MAX))
    }

    /// Adaptive-width float, see the module docs for the wire contract.
    pub fn write_f32_auto(&mut self, v: f32) -> Result<(), CodecError> {
        let raw = scale_to_raw(f64::from(v), AUTO_SCALE, i32::MIN as i64, i32::MAX as i64) as i32;
        if raw > i16::MIN as i32 && raw <= i16::MAX as i32 {
            self.write_i16(raw as i16)
        } else {
            self.write_i16(i16::MIN)?;
            self.write_i32(raw)
        }
    }
}

impl Default for PacketWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Round `v * scale` to the nearest integer, saturating at `[min, max]`.
/// Non-finite inputs map to zero.
fn scale_to_raw(v: f64, scale: f64, min: i64, max: i64) -> i64 {
    if !v.is_finite() {
        return 0;
    }
    let scaled = libm::round(v * scale);
    if scaled <= min as f64 {
        min
    } else if scaled >= max as f64 {
        max
    } else {
        scaled as i64
    }
}

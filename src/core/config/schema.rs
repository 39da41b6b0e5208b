//! Canonical wire schema for the configuration record
//!
//! The record contains a variable-length name mid-stream, so it is not
//! randomly addressable: both directions must walk the fields in one
//! canonical order. That order is written down exactly once, in
//! [`VehicleConfig::traverse`], and consumed by both the wire encoder and
//! the wire decoder through the [`FieldCodec`] visitor. Adding, removing, or
//! moving a field is a single edit that cannot desynchronize the two sides.

use heapless::String;
use nalgebra::{Matrix3, Vector3};

use super::{VehicleConfig, LOG_NAME_MAX};
use crate::communication::link::codec::{ByteReader, CodecError, PacketWriter};

/// One visit per field, in canonical order. Implemented by the wire encoder
/// and decoder; a visitor sees every field as `&mut` so a single traversal
/// serves both directions.
pub trait FieldCodec {
    fn flag(&mut self, v: &mut bool) -> Result<(), CodecError>;
    fn byte(&mut self, v: &mut u8) -> Result<(), CodecError>;
    fn int16(&mut self, v: &mut i16) -> Result<(), CodecError>;
    fn uint16(&mut self, v: &mut u16) -> Result<(), CodecError>;
    fn int32(&mut self, v: &mut i32) -> Result<(), CodecError>;
    fn uint32(&mut self, v: &mut u32) -> Result<(), CodecError>;
    /// Adaptive-width float (see the codec module).
    fn float(&mut self, v: &mut f32) -> Result<(), CodecError>;
    /// Sentinel-terminated ASCII name segment.
    fn name(&mut self, v: &mut String<LOG_NAME_MAX>) -> Result<(), CodecError>;

    fn vec3(&mut self, v: &mut Vector3<f32>) -> Result<(), CodecError> {
        for i in 0..3 {
            self.float(&mut v[i])?;
        }
        Ok(())
    }

    /// Row-major traversal.
    fn mat3(&mut self, v: &mut Matrix3<f32>) -> Result<(), CodecError> {
        for r in 0..3 {
            for c in 0..3 {
                self.float(&mut v[(r, c)])?;
            }
        }
        Ok(())
    }
}

impl VehicleConfig {
    /// Walk every field in canonical wire order.
    pub fn traverse<C: FieldCodec>(&mut self, c: &mut C) -> Result<(), CodecError> {
        c.flag(&mut self.mag.enabled)?;
        c.flag(&mut self.mag.compensate)?;
        c.float(&mut self.mag.yaw_gain)?;
        c.vec3(&mut self.mag.offset)?;
        c.mat3(&mut self.mag.soft_iron)?;

        c.float(&mut self.gnss.ant_x)?;
        c.float(&mut self.gnss.ant_y)?;
        c.flag(&mut self.gnss.compensate)?;
        c.flag(&mut self.gnss.require_rtk)?;
        c.flag(&mut self.gnss.base_as_enu_ref)?;
        c.float(&mut self.gnss.corr_gain_stat)?;
        c.float(&mut self.gnss.corr_gain_dyn)?;
        c.float(&mut self.gnss.corr_gain_yaw)?;
        c.flag(&mut self.gnss.send_nmea)?;
        c.flag(&mut self.gnss.use_ubx_info)?;
        c.float(&mut self.gnss.ubx_max_acc)?;

        c.float(&mut self.uwb_max_corr)?;

        c.flag(&mut self.ap.repeat_routes)?;
        c.float(&mut self.ap.base_rad)?;
        c.float(&mut self.ap.rad_time_ahead)?;
        c.flag(&mut self.ap.mode_time)?;
        c.float(&mut self.ap.max_speed)?;
        c.int32(&mut self.ap.time_add_repeat_ms)?;

        c.int16(&mut self.log.rate_hz)?;
        c.flag(&mut self.log.enabled)?;
        c.name(&mut self.log.name)?;
        c.byte(&mut self.log.mode_ext)?;
        c.uint32(&mut self.log.uart_baud)?;

        c.flag(&mut self.car.yaw_use_odometry)?;
        c.float(&mut self.car.yaw_imu_gain)?;
        c.flag(&mut self.car.disable_motor)?;
        c.flag(&mut self.car.simulate_motor)?;
        c.flag(&mut self.car.clamp_imu_yaw_stationary)?;
        c.flag(&mut self.car.use_uwb_pos)?;
        c.float(&mut self.car.gear_ratio)?;
        c.float(&mut self.car.wheel_diam)?;
        c.float(&mut self.car.motor_poles)?;
        c.float(&mut self.car.steering_max_angle_rad)?;
        c.float(&mut self.car.steering_center)?;
        c.float(&mut self.car.steering_range)?;
        c.float(&mut self.car.steering_ramp_time)?;
        c.float(&mut self.car.axis_distance)?;

        c.float(&mut self.mr.vel_decay_e)?;
        c.float(&mut self.mr.vel_decay_l)?;
        c.float(&mut self.mr.vel_max)?;
        c.float(&mut self.mr.map_min_x)?;
        c.float(&mut self.mr.map_max_x)?;
        c.float(&mut self.mr.map_min_y)?;
        c.float(&mut self.mr.map_max_y)?;
        c.float(&mut self.mr.vel_gain_p)?;
        c.float(&mut self.mr.vel_gain_i)?;
        c.float(&mut self.mr.vel_gain_d)?;
        c.float(&mut self.mr.tilt_gain_p)?;
        c.float(&mut self.mr.tilt_gain_i)?;
        c.float(&mut self.mr.tilt_gain_d)?;
        c.float(&mut self.mr.max_corr_error)?;
        c.float(&mut self.mr.max_tilt_error)?;
        c.float(&mut self.mr.ctrl_gain_roll_p)?;
        c.float(&mut self.mr.ctrl_gain_roll_i)?;
        c.float(&mut self.mr.ctrl_gain_roll_dp)?;
        c.float(&mut self.mr.ctrl_gain_roll_de)?;
        c.float(&mut self.mr.ctrl_gain_pitch_p)?;
        c.float(&mut self.mr.ctrl_gain_pitch_i)?;
        c.float(&mut self.mr.ctrl_gain_pitch_dp)?;
        c.float(&mut self.mr.ctrl_gain_pitch_de)?;
        c.float(&mut self.mr.ctrl_gain_yaw_p)?;
        c.float(&mut self.mr.ctrl_gain_yaw_i)?;
        c.float(&mut self.mr.ctrl_gain_yaw_dp)?;
        c.float(&mut self.mr.ctrl_gain_yaw_de)?;
        c.float(&mut self.mr.ctrl_gain_pos_p)?;
        c.float(&mut self.mr.ctrl_gain_pos_i)?;
        c.float(&mut self.mr.ctrl_gain_pos_d)?;
        c.float(&mut self.mr.ctrl_gain_alt_p)?;
        c.float(&mut self.mr.ctrl_gain_alt_i)?;
        c.float(&mut self.mr.ctrl_gain_alt_d)?;
        c.float(&mut self.mr.js_gain_tilt)?;
        c.float(&mut self.mr.js_gain_yaw)?;
        c.flag(&mut self.mr.js_mode_rate)?;
        c.byte(&mut self.mr.motor_fl_f)?;
        c.byte(&mut self.mr.motor_bl_l)?;
        c.byte(&mut self.mr.motor_fr_r)?;
        c.byte(&mut self.mr.motor_br_b)?;
        c.flag(&mut self.mr.motors_x)?;
        c.flag(&mut self.mr.motors_cw)?;
        c.uint16(&mut self.mr.motor_pwm_min_us)?;
        c.uint16(&mut self.mr.motor_pwm_max_us)?;

        Ok(())
    }

    /// Decode from the wire, writing each field into the live record as it
    /// is read. On a truncated payload the record is left partially updated
    /// and the caller drops the command.
    pub fn decode_from(&mut self, reader: &mut ByteReader<'_>) -> Result<(), CodecError> {
        self.traverse(&mut WireDecoder { reader })
    }

    /// Append the record to `writer`, byte-for-byte the mirror of
    /// [`VehicleConfig::decode_from`].
    pub fn encode(&self, writer: &mut PacketWriter) -> Result<(), CodecError> {
        self.clone().traverse(&mut WireEncoder { writer })
    }
}

struct WireDecoder<'a, 'r> {
    reader: &'r mut ByteReader<'a>,
}

impl FieldCodec for WireDecoder<'_, '_> {
    fn flag(&mut self, v: &mut bool) -> Result<(), CodecError> {
        *v = self.reader.read_u8()? != 0;
        Ok(())
    }

    fn byte(&mut self, v: &mut u8) -> Result<(), CodecError> {
        *v = self.reader.read_u8()?;
        Ok(())
    }

    fn int16(&mut self, v: &mut i16) -> Result<(), CodecError> {
        *v = self.reader.read_i16()?;
        Ok(())
    }

    fn uint16(&mut self, v: &mut u16) -> Result<(), CodecError> {
        *v = self.reader.read_u16()?;
        Ok(())
    }

    fn int32(&mut self, v: &mut i32) -> Result<(), CodecError> {
        *v = self.reader.read_i32()?;
        Ok(())
    }

    fn uint32(&mut self, v: &mut u32) -> Result<(), CodecError> {
        *v = self.reader.read_u32()?;
        Ok(())
    }

    fn float(&mut self, v: &mut f32) -> Result<(), CodecError> {
        *v = self.reader.read_f32_auto()?;
        Ok(())
    }

    fn name(&mut self, v: &mut String<LOG_NAME_MAX>) -> Result<(), CodecError> {
        v.clear();
        loop {
            let b = self.reader.read_u8()?;
            if b == 0 {
                return Ok(());
            }
            // Names beyond capacity and non-ASCII bytes are dropped, but the
            // sentinel is always consumed so the stream stays aligned.
            if b.is_ascii() {
                let _ = v.push(b as char);
            }
        }
    }
}

struct WireEncoder<'w> {
    writer: &'w mut PacketWriter,
}

impl FieldCodec for WireEncoder<'_> {
    fn flag(&mut self, v: &mut bool) -> Result<(), CodecError> {
        self.writer.write_u8(*v as u8)
    }

    fn byte(&mut self, v: &mut u8) -> Result<(), CodecError> {
        self.writer.write_u8(*v)
    }

    fn int16(&mut self, v: &mut i16) -> Result<(), CodecError> {
        self.writer.write_i16(*v)
    }

    fn uint16(&mut self, v: &mut u16) -> Result<(), CodecError> {
        self.writer.write_u16(*v)
    }

    fn int32(&mut self, v: &mut i32) -> Result<(), CodecError> {
        self.writer.write_i32(*v)
    }

    fn uint32(&mut self, v: &mut u32) -> Result<(), CodecError> {
        self.writer.write_u32(*v)
    }

    fn float(&mut self, v: &mut f32) -> Result<(), CodecError> {
        self.writer.write_f32_auto(*v)
    }

    fn name(&mut self, v: &mut String<LOG_NAME_MAX>) -> Result<(), CodecError> {
        self.writer.write_bytes(v.as_bytes())?;
        self.writer.write_u8(0)
    }
}

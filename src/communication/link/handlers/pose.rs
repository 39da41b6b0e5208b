//! Pose and reference-frame handlers
//!
//! Direct pose overrides and the ENU tangent-plane origin. These exist so a
//! control station can re-anchor the position estimate, for example after
//! moving the vehicle by hand or when bootstrapping without RTK.

use super::super::codec::{ByteReader, CodecError, PacketWriter};
use super::super::{ANGLE_SCALE, HEIGHT_SCALE, LLH_SCALE, POS_SCALE};
use crate::core::traits::{Gnss, PositionEstimator, ReplySink};

/// Override the pose estimate with `x, y, yaw`.
pub fn set_pose(
    r: &mut ByteReader<'_>,
    position: &mut dyn PositionEstimator,
) -> Result<(), CodecError> {
    let x = r.read_f32_scaled(POS_SCALE)?;
    let y = r.read_f32_scaled(POS_SCALE)?;
    let yaw = r.read_f32_scaled(ANGLE_SCALE)?;
    position.set_position(x, y, yaw);
    Ok(())
}

/// Set the local tangent-plane origin.
pub fn set_enu_ref(r: &mut ByteReader<'_>, gnss: &mut dyn Gnss) -> Result<(), CodecError> {
    let lat = r.read_f64_scaled(LLH_SCALE)?;
    let lon = r.read_f64_scaled(LLH_SCALE)?;
    let height = r.read_f32_scaled(HEIGHT_SCALE)?;
    gnss.set_enu_ref(lat, lon, height);
    Ok(())
}

/// Reply with the current tangent-plane origin.
pub fn report_enu_ref(
    reply_id: u8,
    command: u8,
    gnss: &dyn Gnss,
    sink: &mut dyn ReplySink,
) -> Result<(), CodecError> {
    let (lat, lon, height) = gnss.enu_ref();
    let mut w = PacketWriter::new();
    w.write_u8(reply_id)?;
    w.write_u8(command)?;
    w.write_f64_scaled(lat, LLH_SCALE)?;
    w.write_f64_scaled(lon, LLH_SCALE)?;
    w.write_f32_scaled(height, HEIGHT_SCALE)?;
    sink.send(w.as_slice());
    Ok(())
}

/// Adjust the heading offset applied on top of the raw yaw estimate.
pub fn set_yaw_offset(
    r: &mut ByteReader<'_>,
    position: &mut dyn PositionEstimator,
) -> Result<(), CodecError> {
    let yaw = r.read_f32_scaled(ANGLE_SCALE)?;
    position.set_yaw_offset(yaw);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::mock::{MockGnss, MockPositionEstimator, RecordingSink};

    #[test]
    fn test_set_pose_scales() {
        let mut w = PacketWriter::new();
        w.write_f32_scaled(1.5, POS_SCALE).unwrap();
        w.write_f32_scaled(-2.25, POS_SCALE).unwrap();
        w.write_f32_scaled(0.7854, ANGLE_SCALE).unwrap();

        let mut position = MockPositionEstimator::default();
        set_pose(&mut ByteReader::new(w.as_slice()), &mut position).unwrap();
        let (x, y, yaw) = position.position.unwrap();
        assert!((x - 1.5).abs() < 1e-4);
        assert!((y + 2.25).abs() < 1e-4);
        assert!((yaw - 0.7854).abs() < 1e-6);
    }

    #[test]
    fn test_enu_ref_roundtrip_through_handlers() {
        let mut w = PacketWriter::new();
        w.write_f64_scaled(57.7157243, LLH_SCALE).unwrap();
        w.write_f64_scaled(12.8946325, LLH_SCALE).unwrap();
        w.write_f32_scaled(103.5, HEIGHT_SCALE).unwrap();

        let mut gnss = MockGnss::default();
        set_enu_ref(&mut ByteReader::new(w.as_slice()), &mut gnss).unwrap();
        assert!((gnss.enu_ref.0 - 57.7157243).abs() < 1e-12);
        assert!((gnss.enu_ref.1 - 12.8946325).abs() < 1e-12);
        assert!((gnss.enu_ref.2 - 103.5).abs() < 1e-3);

        let mut sink = RecordingSink::new();
        report_enu_ref(1, 5, &gnss, &mut sink).unwrap();
        let frame = sink.last().unwrap();
        assert_eq!(&frame[..2], &[1, 5]);
        let mut r = ByteReader::new(&frame[2..]);
        assert!((r.read_f64_scaled(LLH_SCALE).unwrap() - 57.7157243).abs() < 1e-12);
        assert!((r.read_f64_scaled(LLH_SCALE).unwrap() - 12.8946325).abs() < 1e-12);
        assert!((r.read_f32_scaled(HEIGHT_SCALE).unwrap() - 103.5).abs() < 1e-3);
    }

    #[test]
    fn test_truncated_payload_is_an_error() {
        let mut w = PacketWriter::new();
        w.write_f32_scaled(1.0, POS_SCALE).unwrap();
        let mut position = MockPositionEstimator::default();
        assert_eq!(
            set_pose(&mut ByteReader::new(w.as_slice()), &mut position),
            Err(CodecError::Underflow)
        );
        assert!(position.position.is_none());
    }
}

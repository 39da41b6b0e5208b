//! Route synchronization handlers
//!
//! The route lives in the autopilot; this module implements the link-side
//! operations that mutate and page through it. Batch mutations follow an
//! at-most-partial-success contract: a batch stops at the first rejected
//! point, the applied count is returned to the caller, and the wire
//! acknowledgement (sent by the dispatcher) stays unconditional. Stations
//! detect partial application by re-reading the route length.

use super::super::codec::{ByteReader, CodecError, PacketWriter};
use super::super::{POS_SCALE, SPEED_SCALE};
use crate::core::route::RoutePoint;
use crate::core::traits::{Autopilot, ReplySink};

/// Largest number of points one segment reply may carry, keeping the reply
/// inside the frame capacity even when every adaptive field goes wide.
pub const MAX_SEGMENT_POINTS: u8 = 20;

fn read_point(r: &mut ByteReader<'_>) -> Result<RoutePoint, CodecError> {
    Ok(RoutePoint {
        px: r.read_f32_scaled(POS_SCALE)?,
        py: r.read_f32_scaled(POS_SCALE)?,
        pz: r.read_f32_scaled(POS_SCALE)?,
        speed: r.read_f32_scaled(SPEED_SCALE)?,
        time_ms: r.read_i32()?,
        attributes: r.read_u32()?,
    })
}

fn write_point_auto(w: &mut PacketWriter, p: &RoutePoint) -> Result<(), CodecError> {
    w.write_f32_auto(p.px)?;
    w.write_f32_auto(p.py)?;
    w.write_f32_auto(p.pz)?;
    w.write_f32_auto(p.speed)?;
    w.write_i32(p.time_ms)?;
    w.write_u32(p.attributes)
}

/// Append points until the payload is exhausted or the autopilot rejects
/// one. Returns how many points were actually applied.
pub fn add_points(r: &mut ByteReader<'_>, ap: &mut dyn Autopilot) -> Result<usize, CodecError> {
    let mut applied = 0;
    let mut first = true;
    while !r.is_empty() {
        let point = read_point(r)?;
        if !ap.add_point(&point, first) {
            break;
        }
        first = false;
        applied += 1;
    }
    Ok(applied)
}

/// Replace the whole route with the first decoded point, appending the rest.
/// A rejected replacement downgrades the first point to a plain first
/// append; later points are appended without regard for rejections.
pub fn replace_route(r: &mut ByteReader<'_>, ap: &mut dyn Autopilot) -> Result<(), CodecError> {
    let mut first = true;
    while !r.is_empty() {
        let point = read_point(r)?;
        if first {
            first = false;
            if !ap.replace_route(&point) {
                ap.add_point(&point, true);
            }
        } else {
            ap.add_point(&point, false);
        }
    }
    Ok(())
}

/// Page through the route: reply with the total length and `count` points
/// starting at `first`. Requests beyond [`MAX_SEGMENT_POINTS`] are dropped
/// without a reply; the station times out and retries with a smaller count.
/// Indices outside the current route are passed to the autopilot as-is.
pub fn report_segment(
    r: &mut ByteReader<'_>,
    reply_id: u8,
    command: u8,
    ap: &dyn Autopilot,
    sink: &mut dyn ReplySink,
) -> Result<(), CodecError> {
    let first = r.read_i32()?;
    let count = r.read_u8()?;
    if count > MAX_SEGMENT_POINTS {
        return Ok(());
    }

    let mut w = PacketWriter::new();
    w.write_u8(reply_id)?;
    w.write_u8(command)?;
    w.write_i32(ap.route_len() as i32)?;
    for i in 0..i32::from(count) {
        write_point_auto(&mut w, &ap.route_point(first.saturating_add(i)))?;
    }
    sink.send(w.as_slice());
    Ok(())
}

/// Apply the active flag and optionally reset path-follow state.
pub fn set_active(r: &mut ByteReader<'_>, ap: &mut dyn Autopilot) -> Result<(), CodecError> {
    let active = r.read_u8()? != 0;
    let reset = r.read_u8()? != 0;
    ap.set_active(active);
    if reset {
        ap.reset_state();
    }
    Ok(())
}

/// Forward a time-reconciliation request for one route point.
pub fn sync_point(r: &mut ByteReader<'_>, ap: &mut dyn Autopilot) -> Result<(), CodecError> {
    let point = r.read_i32()?;
    let time_ms = r.read_i32()?;
    let min_diff_ms = r.read_i32()?;
    ap.sync_point(point, time_ms, min_diff_ms);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::mock::{MockAutopilot, RecordingSink};

    fn encode_points(points: &[RoutePoint]) -> PacketWriter {
        let mut w = PacketWriter::new();
        for p in points {
            w.write_f32_scaled(p.px, POS_SCALE).unwrap();
            w.write_f32_scaled(p.py, POS_SCALE).unwrap();
            w.write_f32_scaled(p.pz, POS_SCALE).unwrap();
            w.write_f32_scaled(p.speed, SPEED_SCALE).unwrap();
            w.write_i32(p.time_ms).unwrap();
            w.write_u32(p.attributes).unwrap();
        }
        w
    }

    fn point(x: f32) -> RoutePoint {
        RoutePoint {
            px: x,
            py: x + 0.5,
            pz: 0.0,
            speed: 1.5,
            time_ms: 2_000,
            attributes: 0x10,
        }
    }

    #[test]
    fn test_add_points_applies_all() {
        let points = [point(1.0), point(2.0), point(3.0)];
        let mut ap = MockAutopilot::default();
        let applied =
            add_points(&mut ByteReader::new(encode_points(&points).as_slice()), &mut ap).unwrap();
        assert_eq!(applied, 3);
        assert_eq!(ap.route_len(), 3);
        assert!((ap.route[1].px - 2.0).abs() < 1e-4);
        assert_eq!(ap.route[2].attributes, 0x10);
    }

    #[test]
    fn test_add_points_stops_at_first_rejection() {
        let points = [point(1.0), point(2.0), point(3.0), point(4.0)];
        let mut ap = MockAutopilot {
            capacity: 2,
            ..Default::default()
        };
        let applied =
            add_points(&mut ByteReader::new(encode_points(&points).as_slice()), &mut ap).unwrap();
        assert_eq!(applied, 2);
        assert_eq!(ap.route_len(), 2);
    }

    #[test]
    fn test_replace_route_replaces_then_appends() {
        let mut ap = MockAutopilot::default();
        let old = [point(9.0), point(9.5)];
        add_points(&mut ByteReader::new(encode_points(&old).as_slice()), &mut ap).unwrap();

        let new = [point(1.0), point(2.0)];
        replace_route(&mut ByteReader::new(encode_points(&new).as_slice()), &mut ap).unwrap();
        assert_eq!(ap.route_len(), 2);
        assert!((ap.route[0].px - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_replace_route_falls_back_to_append() {
        let mut ap = MockAutopilot {
            accept_replace: false,
            ..Default::default()
        };
        let new = [point(1.0), point(2.0)];
        replace_route(&mut ByteReader::new(encode_points(&new).as_slice()), &mut ap).unwrap();
        // the rejected replacement is re-offered as a first append
        assert_eq!(ap.route_len(), 2);
        assert!((ap.route[0].px - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_segment_reply_layout() {
        let mut ap = MockAutopilot::default();
        for i in 0..5 {
            ap.add_point(&point(i as f32), i == 0);
        }

        let mut req = PacketWriter::new();
        req.write_i32(1).unwrap();
        req.write_u8(2).unwrap();

        let mut sink = RecordingSink::new();
        report_segment(&mut ByteReader::new(req.as_slice()), 1, 9, &ap, &mut sink).unwrap();
        let frame = sink.last().unwrap();
        assert_eq!(&frame[..2], &[1, 9]);

        let mut r = ByteReader::new(&frame[2..]);
        assert_eq!(r.read_i32().unwrap(), 5);
        let p = RoutePoint {
            px: r.read_f32_auto().unwrap(),
            py: r.read_f32_auto().unwrap(),
            pz: r.read_f32_auto().unwrap(),
            speed: r.read_f32_auto().unwrap(),
            time_ms: r.read_i32().unwrap(),
            attributes: r.read_u32().unwrap(),
        };
        assert!((p.px - 1.0).abs() < 1e-4);
        assert!((p.py - 1.5).abs() < 1e-4);
        assert!((p.speed - 1.5).abs() < 1e-4);
        assert_eq!(p.time_ms, 2_000);
        assert_eq!(p.attributes, 0x10);
    }

    #[test]
    fn test_oversized_segment_request_sends_nothing() {
        let ap = MockAutopilot::default();
        let mut req = PacketWriter::new();
        req.write_i32(0).unwrap();
        req.write_u8(MAX_SEGMENT_POINTS + 1).unwrap();
        let mut sink = RecordingSink::new();
        report_segment(&mut ByteReader::new(req.as_slice()), 1, 9, &ap, &mut sink).unwrap();
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_out_of_range_indices_are_delegated() {
        let mut ap = MockAutopilot::default();
        ap.add_point(&point(1.0), true);

        let mut req = PacketWriter::new();
        req.write_i32(0).unwrap();
        req.write_u8(3).unwrap();
        let mut sink = RecordingSink::new();
        report_segment(&mut ByteReader::new(req.as_slice()), 1, 9, &ap, &mut sink).unwrap();

        let frame = sink.last().unwrap();
        let mut r = ByteReader::new(&frame[2..]);
        assert_eq!(r.read_i32().unwrap(), 1);
        // the mock pads missing points with zeroed values
        let mut points = [RoutePoint::default(); 3];
        for p in points.iter_mut() {
            p.px = r.read_f32_auto().unwrap();
            p.py = r.read_f32_auto().unwrap();
            p.pz = r.read_f32_auto().unwrap();
            p.speed = r.read_f32_auto().unwrap();
            p.time_ms = r.read_i32().unwrap();
            p.attributes = r.read_u32().unwrap();
        }
        assert!(r.is_empty());
        assert!((points[0].px - 1.0).abs() < 1e-4);
        assert_eq!(points[1], RoutePoint::default());
        assert_eq!(points[2], RoutePoint::default());
    }

    #[test]
    fn test_set_active_with_reset() {
        let mut ap = MockAutopilot::default();
        set_active(&mut ByteReader::new(&[1, 1]), &mut ap).unwrap();
        assert!(ap.active);
        assert_eq!(ap.resets, 1);

        set_active(&mut ByteReader::new(&[0, 0]), &mut ap).unwrap();
        assert!(!ap.active);
        assert_eq!(ap.resets, 1);
    }

    #[test]
    fn test_sync_point_forwards_arguments() {
        let mut ap = MockAutopilot::default();
        let mut w = PacketWriter::new();
        w.write_i32(4).unwrap();
        w.write_i32(120_000).unwrap();
        w.write_i32(500).unwrap();
        sync_point(&mut ByteReader::new(w.as_slice()), &mut ap).unwrap();
        assert_eq!(ap.sync_calls.as_slice(), &[(4, 120_000, 500)]);
    }

    #[test]
    fn test_truncated_point_batch_is_an_error() {
        let points = [point(1.0)];
        let w = encode_points(&points);
        let cut = &w.as_slice()[..w.len() - 2];
        let mut ap = MockAutopilot::default();
        assert_eq!(
            add_points(&mut ByteReader::new(cut), &mut ap),
            Err(CodecError::Underflow)
        );
    }
}

//! Outbound-only messages
//!
//! Status text, plot streaming, the secondary-channel log line, and the
//! NMEA forward. None of these are commands; they are composed locally and
//! pushed through whatever sink the caller is holding. Print-style text is
//! truncated to the frame capacity with the excess silently dropped.

use core::fmt;

use super::codec::{CodecError, PacketWriter, MAX_FRAME_LEN};
use super::command::CommandId;
use super::ID_CAR_CLIENT;
use crate::core::config::VehicleConfig;
use crate::core::traits::ReplySink;

/// `fmt::Write` sink that keeps what fits and reports success regardless,
/// so formatting never fails on long text.
struct TruncatingWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl fmt::Write for TruncatingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let space = self.buf.len() - self.len;
        let n = s.len().min(space);
        self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        Ok(())
    }
}

fn send_text(receiver: u8, command: CommandId, sink: &mut dyn ReplySink, args: fmt::Arguments<'_>) {
    let mut frame = [0u8; MAX_FRAME_LEN];
    frame[0] = receiver;
    frame[1] = command as u8;
    let used = {
        let mut w = TruncatingWriter {
            buf: &mut frame[2..],
            len: 0,
        };
        let _ = fmt::write(&mut w, args);
        w.len
    };
    if used > 0 {
        sink.send(&frame[..2 + used]);
    }
}

/// Freeform status text for the control station console.
pub fn send_status(own_id: u8, sink: &mut dyn ReplySink, args: fmt::Arguments<'_>) {
    send_text(own_id, CommandId::Printf, sink, args);
}

/// Print-style line for the secondary wired channel, addressed to the
/// companion compute unit.
pub fn send_log_line(sink: &mut dyn ReplySink, args: fmt::Arguments<'_>) {
    send_text(ID_CAR_CLIENT, CommandId::LogLine, sink, args);
}

/// Build one frame and send it, dropping it silently when it would not fit.
fn send_packet(
    sink: &mut dyn ReplySink,
    build: impl FnOnce(&mut PacketWriter) -> Result<(), CodecError>,
) {
    let mut w = PacketWriter::new();
    if build(&mut w).is_ok() {
        sink.send(w.as_slice());
    }
}

/// Start a plot stream with the two axis names.
pub fn plot_init(own_id: u8, sink: &mut dyn ReplySink, name_x: &str, name_y: &str) {
    send_packet(sink, |w| {
        w.write_u8(own_id)?;
        w.write_u8(CommandId::PlotInit as u8)?;
        w.write_bytes(name_x.as_bytes())?;
        w.write_u8(0)?;
        w.write_bytes(name_y.as_bytes())?;
        w.write_u8(0)
    });
}

/// Add a named graph to the current plot.
pub fn plot_add_graph(own_id: u8, sink: &mut dyn ReplySink, name: &str) {
    send_packet(sink, |w| {
        w.write_u8(own_id)?;
        w.write_u8(CommandId::PlotAddGraph as u8)?;
        w.write_bytes(name.as_bytes())?;
        w.write_u8(0)
    });
}

/// Select which graph subsequent samples belong to.
pub fn plot_set_graph(own_id: u8, sink: &mut dyn ReplySink, graph: u8) {
    send_packet(sink, |w| {
        w.write_u8(own_id)?;
        w.write_u8(CommandId::PlotSetGraph as u8)?;
        w.write_u8(graph)
    });
}

/// Append one sample to the selected graph.
pub fn plot_sample(own_id: u8, sink: &mut dyn ReplySink, x: f32, y: f32) {
    send_packet(sink, |w| {
        w.write_u8(own_id)?;
        w.write_u8(CommandId::PlotData as u8)?;
        w.write_f32_auto(x)?;
        w.write_f32_auto(y)
    });
}

/// Forward an NMEA sentence over the radio link, when enabled.
pub fn send_nmea(config: &VehicleConfig, own_id: u8, sink: &mut dyn ReplySink, sentence: &[u8]) {
    if !config.gnss.send_nmea {
        return;
    }
    send_packet(sink, |w| {
        w.write_u8(own_id)?;
        w.write_u8(CommandId::NmeaRadio as u8)?;
        w.write_bytes(sentence)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::mock::RecordingSink;

    #[test]
    fn test_status_text_layout() {
        let mut sink = RecordingSink::new();
        send_status(1, &mut sink, format_args!("yaw {:.1} deg", 12.34));
        let frame = sink.last().unwrap();
        assert_eq!(&frame[..2], &[1, CommandId::Printf as u8]);
        assert_eq!(&frame[2..], b"yaw 12.3 deg");
    }

    #[test]
    fn test_status_text_is_truncated_silently() {
        let mut sink = RecordingSink::new();
        let long = "x".repeat(MAX_FRAME_LEN * 2);
        send_status(1, &mut sink, format_args!("{long}"));
        let frame = sink.last().unwrap();
        assert_eq!(frame.len(), MAX_FRAME_LEN);
        assert!(frame[2..].iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_empty_status_is_not_sent() {
        let mut sink = RecordingSink::new();
        send_status(1, &mut sink, format_args!(""));
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_log_line_goes_to_the_car_client() {
        let mut sink = RecordingSink::new();
        send_log_line(&mut sink, format_args!("42;17;3.5"));
        let frame = sink.last().unwrap();
        assert_eq!(&frame[..2], &[ID_CAR_CLIENT, CommandId::LogLine as u8]);
        assert_eq!(&frame[2..], b"42;17;3.5");
    }

    #[test]
    fn test_plot_stream_layout() {
        let mut sink = RecordingSink::new();
        plot_init(1, &mut sink, "t", "v");
        plot_add_graph(1, &mut sink, "speed");
        plot_set_graph(1, &mut sink, 0);
        plot_sample(1, &mut sink, 0.5, 1.5);

        assert_eq!(sink.frames[0].as_slice(), &[1, CommandId::PlotInit as u8, b't', 0, b'v', 0]);
        assert_eq!(
            sink.frames[1].as_slice(),
            &[1, CommandId::PlotAddGraph as u8, b's', b'p', b'e', b'e', b'd', 0]
        );
        assert_eq!(sink.frames[2].as_slice(), &[1, CommandId::PlotSetGraph as u8, 0]);
        // both samples fit the narrow adaptive form
        assert_eq!(
            sink.frames[3].as_slice(),
            &[1, CommandId::PlotData as u8, 0x13, 0x88, 0x3a, 0x98]
        );
    }

    #[test]
    fn test_nmea_forward_is_gated_by_config() {
        let mut config = VehicleConfig::default();
        let mut sink = RecordingSink::new();

        send_nmea(&config, 1, &mut sink, b"$GPGGA,123519,4807.038,N*47");
        assert!(sink.frames.is_empty());

        config.gnss.send_nmea = true;
        send_nmea(&config, 1, &mut sink, b"$GPGGA,123519,4807.038,N*47");
        let frame = sink.last().unwrap();
        assert_eq!(&frame[..2], &[1, CommandId::NmeaRadio as u8]);
        assert_eq!(&frame[2..], b"$GPGGA,123519,4807.038,N*47");
    }
}

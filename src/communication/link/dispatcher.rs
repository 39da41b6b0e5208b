//! Command dispatcher
//!
//! Routes one received packet to its handler and applies the
//! acknowledgement policy.
//!
//! # Architecture
//!
//! 1. Guard against foreign frames (RTCM3 preamble) and short buffers
//! 2. Filter by receiver id and resolve the id replies should carry
//! 3. Classify the command id once into a [`Request`]
//! 4. Run the handler; truncated payloads are logged and dropped
//! 5. Forward the packet to the vehicle-type extension, always
//!
//! Processing is synchronous and non-reentrant: `process` runs to
//! completion on the caller's stack and the reply sink it is handed is used
//! only within that call. The dispatcher owns the live configuration
//! record; everything else belongs to the collaborators in [`Services`].

use super::codec::{ByteReader, CodecError, PacketWriter};
use super::command::Request;
use super::handlers::{config::ConfigHandler, pose, route};
use super::{reply_id, Packet, RTCM3_PREAMBLE};
use crate::core::config::VehicleConfig;
use crate::core::traits::{ReplySink, Services};
use crate::log_warn;

pub struct CommandDispatcher {
    own_id: u8,
    config_handler: ConfigHandler,
}

impl CommandDispatcher {
    pub fn new(own_id: u8) -> Self {
        Self {
            own_id,
            config_handler: ConfigHandler::default(),
        }
    }

    /// Start from a previously persisted configuration record.
    pub fn with_config(own_id: u8, config: VehicleConfig) -> Self {
        Self {
            own_id,
            config_handler: ConfigHandler::new(config),
        }
    }

    pub fn own_id(&self) -> u8 {
        self.own_id
    }

    /// The live configuration record.
    pub fn config(&self) -> &VehicleConfig {
        self.config_handler.config()
    }

    /// Process one received packet buffer.
    ///
    /// `sink` is where replies for this packet go; the transport layer hands
    /// in whichever link the packet arrived on (or a redirected one).
    pub fn process(&mut self, data: &[u8], services: &mut Services<'_>, sink: &mut dyn ReplySink) {
        if data.is_empty() {
            return;
        }
        if data[0] == RTCM3_PREAMBLE {
            log_warn!("RTCM3 frame on the command link, dropping");
            return;
        }
        let Some(packet) = Packet::parse(data) else {
            return;
        };
        let Some(reply_id) = reply_id(self.own_id, packet.receiver) else {
            return;
        };

        if let Some(request) = Request::classify(packet.command) {
            if self
                .handle(request, packet.command, packet.payload, reply_id, services, sink)
                .is_err()
            {
                log_warn!("truncated payload for command {}, dropping", packet.command);
            }
        }

        // vehicle-type-specific commands ride on the same packet
        services
            .extension
            .process(packet.command, packet.payload, reply_id, sink);
    }

    fn handle(
        &mut self,
        request: Request,
        command: u8,
        payload: &[u8],
        reply_id: u8,
        services: &mut Services<'_>,
        sink: &mut dyn ReplySink,
    ) -> Result<(), CodecError> {
        let mut r = ByteReader::new(payload);

        match request {
            Request::Heartbeat => services.watchdog.reset(),

            Request::Terminal => match core::str::from_utf8(terminal_line(payload)) {
                Ok(line) => services.terminal.process_line(line, sink),
                Err(_) => log_warn!("non-UTF-8 terminal line, dropping"),
            },

            Request::SetPose { ack } => {
                pose::set_pose(&mut r, &mut *services.position)?;
                if ack {
                    send_ack(reply_id, command, sink)?;
                }
            }

            Request::SetEnuRef => {
                pose::set_enu_ref(&mut r, &mut *services.gnss)?;
                send_ack(reply_id, command, sink)?;
            }

            Request::GetEnuRef => {
                services.watchdog.reset();
                pose::report_enu_ref(reply_id, command, &*services.gnss, sink)?;
            }

            Request::AddRoutePoints => {
                route::add_points(&mut r, &mut *services.autopilot)?;
                send_ack(reply_id, command, sink)?;
            }

            Request::RemoveLastRoutePoint => {
                services.autopilot.remove_last_point();
                send_ack(reply_id, command, sink)?;
            }

            Request::ClearRoute => {
                services.autopilot.clear_route();
                send_ack(reply_id, command, sink)?;
            }

            Request::GetRouteSegment => {
                route::report_segment(&mut r, reply_id, command, &*services.autopilot, sink)?;
            }

            Request::SetApActive => {
                route::set_active(&mut r, &mut *services.autopilot)?;
                send_ack(reply_id, command, sink)?;
            }

            Request::ReplaceRoute => {
                route::replace_route(&mut r, &mut *services.autopilot)?;
                send_ack(reply_id, command, sink)?;
            }

            Request::SyncPoint => {
                route::sync_point(&mut r, &mut *services.autopilot)?;
                send_ack(reply_id, command, sink)?;
            }

            Request::RtcmIn => services.gnss.input_rtcm(payload),

            Request::SetYawOffset { ack } => {
                pose::set_yaw_offset(&mut r, &mut *services.position)?;
                if ack {
                    send_ack(reply_id, command, sink)?;
                }
            }

            Request::SetConfig => {
                self.config_handler.apply(
                    &mut r,
                    &mut *services.log,
                    &mut *services.motor_sim,
                    &mut *services.storage,
                )?;
                send_ack(reply_id, command, sink)?;
            }

            Request::GetConfig { default } => {
                self.config_handler
                    .report(default, reply_id, command, &*services.storage, sink)?;
            }
        }
        Ok(())
    }
}

fn send_ack(reply_id: u8, command: u8, sink: &mut dyn ReplySink) -> Result<(), CodecError> {
    let mut w = PacketWriter::new();
    w.write_u8(reply_id)?;
    w.write_u8(command)?;
    sink.send(w.as_slice());
    Ok(())
}

/// Terminal payloads may carry a trailing sentinel from the sender; the
/// line ends at the first zero byte.
fn terminal_line(payload: &[u8]) -> &[u8] {
    payload
        .split(|&b| b == 0)
        .next()
        .unwrap_or(payload)
}

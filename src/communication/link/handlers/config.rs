//! Configuration handler
//!
//! Owns the live [`VehicleConfig`] record. A set-configuration command
//! streams the record straight into the live copy, then pushes the decoded
//! values to the subsystems that cache them and persists the result. Both
//! configuration readbacks (current and factory default) go through the one
//! shared encoder.

use super::super::codec::{ByteReader, CodecError, PacketWriter};
use crate::core::config::VehicleConfig;
use crate::core::traits::{ConfigStorage, DataLog, MotorSimulator, ReplySink};

pub struct ConfigHandler {
    config: VehicleConfig,
}

impl ConfigHandler {
    pub fn new(config: VehicleConfig) -> Self {
        Self { config }
    }

    /// The live record, read by control-loop consumers.
    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Decode a full record from the wire and propagate it.
    pub fn apply(
        &mut self,
        r: &mut ByteReader<'_>,
        log: &mut dyn DataLog,
        motor_sim: &mut dyn MotorSimulator,
        storage: &mut dyn ConfigStorage,
    ) -> Result<(), CodecError> {
        self.config.decode_from(r)?;

        log.set_rate_hz(self.config.log.rate_hz);
        log.set_enabled(self.config.log.enabled);
        log.set_name(&self.config.log.name);
        motor_sim.set_running(self.config.car.simulate_motor);

        storage.store(&self.config);
        Ok(())
    }

    /// Reply with the live record, or the factory defaults when `default`
    /// is set. Both paths share one encoder.
    pub fn report(
        &self,
        default: bool,
        reply_id: u8,
        command: u8,
        storage: &dyn ConfigStorage,
        sink: &mut dyn ReplySink,
    ) -> Result<(), CodecError> {
        let mut w = PacketWriter::new();
        w.write_u8(reply_id)?;
        w.write_u8(command)?;
        if default {
            storage.default_config().encode(&mut w)?;
        } else {
            self.config.encode(&mut w)?;
        }
        sink.send(w.as_slice());
        Ok(())
    }
}

impl Default for ConfigHandler {
    fn default() -> Self {
        Self::new(VehicleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::mock::{
        MockConfigStorage, MockDataLog, MockMotorSimulator, RecordingSink,
    };

    fn encoded(cfg: &VehicleConfig) -> PacketWriter {
        let mut w = PacketWriter::new();
        cfg.encode(&mut w).unwrap();
        w
    }

    #[test]
    fn test_apply_propagates_log_and_motor_sim() {
        let mut cfg = VehicleConfig::default();
        cfg.log.rate_hz = 50;
        cfg.log.enabled = true;
        cfg.log.name.push_str("trip1").unwrap();
        cfg.car.simulate_motor = true;

        let mut handler = ConfigHandler::default();
        let mut log = MockDataLog::default();
        let mut motor_sim = MockMotorSimulator::default();
        let mut storage = MockConfigStorage::default();

        handler
            .apply(
                &mut ByteReader::new(encoded(&cfg).as_slice()),
                &mut log,
                &mut motor_sim,
                &mut storage,
            )
            .unwrap();

        assert_eq!(log.rate_hz, 50);
        assert!(log.enabled);
        assert_eq!(log.name.as_str(), "trip1");
        assert!(motor_sim.running);
        assert_eq!(storage.stored.as_ref(), Some(handler.config()));
        assert_eq!(handler.config(), &cfg);
    }

    #[test]
    fn test_truncated_record_is_not_persisted() {
        let cfg = VehicleConfig::default();
        let w = encoded(&cfg);
        let cut = &w.as_slice()[..w.len() / 2];

        let mut handler = ConfigHandler::default();
        let mut log = MockDataLog::default();
        let mut motor_sim = MockMotorSimulator::default();
        let mut storage = MockConfigStorage::default();

        assert_eq!(
            handler.apply(
                &mut ByteReader::new(cut),
                &mut log,
                &mut motor_sim,
                &mut storage,
            ),
            Err(CodecError::Underflow)
        );
        assert!(storage.stored.is_none());
        assert_eq!(log.updates, 0);
    }

    #[test]
    fn test_report_current_and_default_share_the_encoding() {
        let mut live = VehicleConfig::default();
        live.ap.max_speed = 3.5;
        let handler = ConfigHandler::new(live.clone());

        let storage = MockConfigStorage::default();
        let mut sink = RecordingSink::new();
        handler.report(false, 1, 17, &storage, &mut sink).unwrap();
        handler.report(true, 1, 18, &storage, &mut sink).unwrap();

        let current = &sink.frames[0];
        let defaults = &sink.frames[1];
        assert_eq!(&current[..2], &[1, 17]);
        assert_eq!(&defaults[..2], &[1, 18]);

        let mut back = VehicleConfig::default();
        back.decode_from(&mut ByteReader::new(&current[2..])).unwrap();
        assert_eq!(back, live);

        let mut back = VehicleConfig::default();
        back.decode_from(&mut ByteReader::new(&defaults[2..])).unwrap();
        assert_eq!(back, storage.default_config());
    }
}

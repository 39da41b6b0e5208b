//! Command handlers
//!
//! One module per subsystem the protocol drives. Handlers decode their
//! payload through a [`ByteReader`](crate::communication::link::codec::ByteReader)
//! and talk to the owning collaborator; acknowledgement policy stays in the
//! dispatcher.

pub mod config;
pub mod pose;
pub mod route;

pub use config::ConfigHandler;

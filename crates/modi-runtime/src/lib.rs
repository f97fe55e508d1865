//! MODI Runtime - The bus seen from the host
//!
//! This crate wires the other MODI crates to a transport:
//! - Registration of modules as the transport discovers them
//! - Telemetry ingestion into proxy caches and the topology map
//! - Health tracking and disconnect detection
//! - Logging setup

pub mod config;
pub mod logging;
pub mod bus;

pub use config::*;
pub use logging::*;
pub use bus::*;

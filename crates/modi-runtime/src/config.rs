//! Runtime configuration

use std::time::Duration;

use modi_core::FirmwareVersion;

/// Bus configuration
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Silence after which a module counts as disconnected
    pub health_timeout: Duration,
    /// Capacity of the inbound telemetry channel
    pub telemetry_buffer: usize,
    /// Property codes telemetry never writes into a cache
    pub reserved_properties: Vec<u16>,
    /// Put new modules into RUN / PnP off and ask for their neighbours
    pub announce_run_state: bool,
    /// Newest released module firmware; older modules are logged as out of date
    pub latest_firmware: Option<FirmwareVersion>,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig {
            health_timeout: Duration::from_secs(2),
            telemetry_buffer: 256,
            reserved_properties: vec![0, 1],
            announce_run_state: true,
            latest_firmware: None,
        }
    }
}

impl BusConfig {
    /// Registration enqueues nothing; the transport manages module state itself
    pub fn quiet() -> Self {
        BusConfig {
            announce_run_state: false,
            ..BusConfig::default()
        }
    }

    pub fn is_reserved(&self, code: u16) -> bool {
        self.reserved_properties.contains(&code)
    }
}

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

//! Bus - registration and telemetry hooks for the transport
//!
//! The transport discovers modules and parses frames; the bus turns what it
//! hears into proxies, cache updates and topology. Commands flow the other
//! way through the shared [`CommandSink`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use modi_core::{
    Command, CommandReceiver, CommandSink, FirmwareVersion, ModiResult, ModuleId, ModuleState,
    ModuleType, ModuleUuid, PnpState,
};
use modi_directory::{Directory, Neighbors};
use modi_modules::{FactoryTable, Led, Module, Speaker};

use crate::BusConfig;

/// Payload of a periodic health report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HealthReport {
    /// Battery level as reported by the module
    pub battery_state: u8,
    /// Odd values mean user code is stored on the module; values below 2
    /// mean the module is not running it
    pub user_code_state: u8,
}

impl HealthReport {
    pub fn new(battery_state: u8, user_code_state: u8) -> Self {
        HealthReport {
            battery_state,
            user_code_state,
        }
    }

    pub fn has_user_code(&self) -> bool {
        self.user_code_state % 2 == 1
    }

    /// The module has dropped out of the run state it was put in
    pub fn needs_run_state(&self) -> bool {
        self.user_code_state < 2
    }
}

/// What the transport reports about the bus
#[derive(Clone, Debug, PartialEq)]
pub enum Telemetry {
    /// A module announced its uuid
    ModuleAppeared {
        id: ModuleId,
        uuid: Option<ModuleUuid>,
        version: Option<FirmwareVersion>,
    },
    /// A module reported a property value
    Property { id: ModuleId, code: u16, value: f64 },
    /// A module reported its neighbours
    Topology { id: ModuleId, neighbors: Neighbors },
    /// Periodic health report
    Health { id: ModuleId, report: HealthReport },
    /// The transport gave up on a module
    ModuleLost { id: ModuleId },
}

/// Inbound telemetry channel, fed by the transport
pub type TelemetrySender = mpsc::Sender<Telemetry>;
pub type TelemetryReceiver = mpsc::Receiver<Telemetry>;

/// Host-side view of one module bus
#[derive(Debug)]
pub struct Bus {
    directory: Directory,
    factories: FactoryTable,
    commands: CommandSink,
    config: BusConfig,
    battery_detected: AtomicBool,
}

impl Bus {
    /// Create a bus with every module type constructible.
    ///
    /// The returned receiver is the transport's end of the command queue.
    pub fn new(config: BusConfig) -> (Bus, CommandReceiver) {
        Self::with_factories(config, FactoryTable::new())
    }

    pub fn with_factories(config: BusConfig, factories: FactoryTable) -> (Bus, CommandReceiver) {
        let (commands, rx) = CommandSink::channel();
        let bus = Bus {
            directory: Directory::new(),
            factories,
            commands,
            config,
            battery_detected: AtomicBool::new(false),
        };
        (bus, rx)
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// A producer handle onto the command queue
    pub fn commands(&self) -> CommandSink {
        self.commands.clone()
    }

    /// Startup sequence: reboot every module with plug-and-play off, then
    /// ask the network module for its uuid
    pub fn start(&self) -> ModiResult<()> {
        tracing::info!("starting bus");
        self.commands.enqueue(Command::module_state(
            ModuleId::BROADCAST,
            ModuleState::Reboot,
            PnpState::Off,
        ))?;
        self.commands.enqueue(Command::request_network_uuid())
    }

    /// Registration hook: build a proxy for a newly announced module and
    /// add it to the directory.
    ///
    /// A module that is already registered is marked connected and its
    /// existing proxy returned.
    pub fn register(&self, id: ModuleId, uuid: Option<ModuleUuid>) -> ModiResult<Module> {
        self.register_with_version(id, uuid, None)
    }

    /// [`Bus::register`] for an announcement that carried a firmware version
    pub fn register_with_version(
        &self,
        id: ModuleId,
        uuid: Option<ModuleUuid>,
        version: Option<FirmwareVersion>,
    ) -> ModiResult<Module> {
        if let Ok(existing) = self.directory.get(id) {
            self.reconnect(&existing, version);
            return Ok(existing);
        }

        let module = self.factories.build(id, uuid, self.commands.clone())?;
        let (module, inserted) = self.directory.insert(module);
        if !inserted {
            // lost a race with another registration of the same id
            self.reconnect(&module, version);
            return Ok(module);
        }

        tracing::info!(
            module = %id,
            module_type = %module.module_type(),
            uuid = ?uuid,
            version = ?version,
            "module connected"
        );
        if let Some(version) = version {
            self.record_version(&module, version);
        }

        if self.config.announce_run_state {
            self.announce(id);
        }
        Ok(module)
    }

    fn reconnect(&self, module: &Module, version: Option<FirmwareVersion>) {
        if !module.is_connected() {
            tracing::info!(
                module = %module.id(),
                module_type = %module.module_type(),
                "module reconnected"
            );
        }
        module.core().mark_seen(Instant::now());
        if let Some(version) = version {
            module.core().set_version(version);
        }
    }

    fn record_version(&self, module: &Module, version: FirmwareVersion) {
        module.core().set_version(version);
        if module.module_type() != ModuleType::Network && !self.is_up_to_date(version) {
            tracing::warn!(
                module = %module.id(),
                module_type = %module.module_type(),
                version = %version,
                "module firmware is not up to date"
            );
        }
    }

    /// False only when a newer firmware is configured
    pub fn is_up_to_date(&self, version: FirmwareVersion) -> bool {
        !matches!(self.config.latest_firmware, Some(latest) if version < latest)
    }

    fn announce(&self, id: ModuleId) {
        let run = Command::module_state(id, ModuleState::Run, PnpState::Off);
        if let Err(e) = self.commands.enqueue(run) {
            tracing::warn!(module = %id, "cannot announce module: {}", e);
            return;
        }
        if let Err(e) = self.request_topology(id) {
            tracing::warn!(module = %id, "cannot request topology: {}", e);
        }
    }

    /// Ask a module to report its neighbours
    pub fn request_topology(&self, id: ModuleId) -> ModiResult<()> {
        for command in Command::request_topology(id) {
            self.commands.enqueue(command)?;
        }
        Ok(())
    }

    /// Drop a module from the directory
    pub fn unregister(&self, id: ModuleId) -> Option<Module> {
        let removed = self.directory.remove(id);
        if removed.is_some() {
            tracing::info!(module = %id, "module removed");
        }
        removed
    }

    /// Telemetry hook: store a reported property value.
    ///
    /// Returns false if the report was dropped (reserved code or unknown module).
    pub fn update_cache(&self, id: ModuleId, code: u16, value: f64) -> bool {
        if self.config.is_reserved(code) {
            tracing::trace!(module = %id, code, "reserved property ignored");
            return false;
        }
        match self.directory.get(id) {
            Ok(module) => {
                module.core().update_property(code, value);
                true
            }
            Err(_) => {
                tracing::debug!(module = %id, code, "property report for unknown module dropped");
                false
            }
        }
    }

    pub fn update_topology(&self, id: ModuleId, neighbors: Neighbors) {
        if neighbors.battery && !self.battery_detected.swap(true, Ordering::AcqRel) {
            tracing::warn!(
                module = %id,
                "battery module attached; topology may be incomplete"
            );
        }
        self.directory.update_topology(id, neighbors);
    }

    /// Some module has reported a battery on one of its sides
    pub fn battery_detected(&self) -> bool {
        self.battery_detected.load(Ordering::Acquire)
    }

    /// Health report; returns false for unknown modules
    pub fn record_health(&self, id: ModuleId, report: HealthReport, now: Instant) -> bool {
        let module = match self.directory.get(id) {
            Ok(module) => module,
            Err(_) => return false,
        };
        if !module.is_connected() {
            tracing::info!(module = %id, "module reconnected");
        }
        module.core().mark_seen(now);

        if report.has_user_code() && module.core().flag_user_code() {
            tracing::warn!(
                module = %id,
                module_type = %module.module_type(),
                "module has user code stored"
            );
        }
        if module.module_type() != ModuleType::Network && report.needs_run_state() {
            let run = Command::module_state(id, ModuleState::Run, PnpState::Off);
            if let Err(e) = self.commands.enqueue(run) {
                tracing::warn!(module = %id, "cannot restore run state: {}", e);
            }
        }
        true
    }

    /// Mark modules silent for longer than the health timeout as
    /// disconnected; returns the ids that changed state.
    ///
    /// Silence is counted from registration for a module that has never
    /// reported health.
    pub fn expire_stale(&self, now: Instant) -> Vec<ModuleId> {
        let timeout = self.config.health_timeout;
        self.directory
            .all()
            .into_iter()
            .filter(|m| m.is_connected())
            .filter(|m| now.saturating_duration_since(m.core().last_seen()) > timeout)
            .map(|m| {
                m.core().mark_disconnected();
                tracing::warn!(
                    module = %m.id(),
                    module_type = %m.module_type(),
                    "module disconnected"
                );
                m.id()
            })
            .collect()
    }

    /// Apply one telemetry report
    pub fn ingest(&self, telemetry: Telemetry) -> ModiResult<()> {
        match telemetry {
            Telemetry::ModuleAppeared { id, uuid, version } => {
                self.register_with_version(id, uuid, version)?;
            }
            Telemetry::Property { id, code, value } => {
                self.update_cache(id, code, value);
            }
            Telemetry::Topology { id, neighbors } => self.update_topology(id, neighbors),
            Telemetry::Health { id, report } => {
                self.record_health(id, report, Instant::now());
            }
            Telemetry::ModuleLost { id } => {
                self.unregister(id);
            }
        }
        Ok(())
    }

    /// Inbound channel sized from the configuration
    pub fn telemetry_channel(&self) -> (TelemetrySender, TelemetryReceiver) {
        mpsc::channel(self.config.telemetry_buffer)
    }

    /// Drain telemetry on a background task until every sender is dropped
    pub fn spawn_telemetry_loop(
        self: Arc<Self>,
        mut telemetry: TelemetryReceiver,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(report) = telemetry.recv().await {
                if let Err(e) = self.ingest(report) {
                    tracing::warn!("telemetry rejected: {}", e);
                }
            }
            tracing::debug!("telemetry channel closed");
        })
    }

    /// Typed lookup of an LED
    pub fn led(&self, id: ModuleId) -> ModiResult<Led> {
        self.directory.get(id)?.try_into_led()
    }

    pub fn speaker(&self, id: ModuleId) -> ModiResult<Speaker> {
        self.directory.get(id)?.try_into_speaker()
    }
}

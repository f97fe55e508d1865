//! Module proxy base and the closed union of proxy types

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use modi_core::{
    Command, CommandSink, FirmwareVersion, ModiError, ModiResult, ModuleId, ModuleType,
    ModuleUuid, PropertyCache, PropertyCode,
};

use crate::{Button, Dial, Display, Env, Gyro, Ir, Led, Mic, Motor, Network, Speaker, Ultrasonic};

/// State shared by every proxy of one physical module
#[derive(Debug)]
pub struct ModuleCore {
    id: ModuleId,
    uuid: Option<ModuleUuid>,
    module_type: ModuleType,
    properties: PropertyCache,
    commands: CommandSink,
    connected: AtomicBool,
    last_seen: Mutex<Instant>,
    version: Mutex<Option<FirmwareVersion>>,
    has_user_code: AtomicBool,
}

impl ModuleCore {
    pub fn new(
        id: ModuleId,
        uuid: Option<ModuleUuid>,
        module_type: ModuleType,
        commands: CommandSink,
    ) -> Self {
        ModuleCore {
            id,
            uuid,
            module_type,
            properties: PropertyCache::new(),
            commands,
            connected: AtomicBool::new(true),
            last_seen: Mutex::new(Instant::now()),
            version: Mutex::new(None),
            has_user_code: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    #[inline]
    pub fn uuid(&self) -> Option<ModuleUuid> {
        self.uuid
    }

    #[inline]
    pub fn module_type(&self) -> ModuleType {
        self.module_type
    }

    /// Last reported value of a property, `None` while unknown
    pub fn property(&self, code: u16) -> Option<f64> {
        self.properties.get(code)
    }

    /// Typed form of [`ModuleCore::property`]
    pub fn get<P: PropertyCode>(&self, property: P) -> Option<f64> {
        self.property(property.code())
    }

    /// Telemetry hook: record a reported value.
    ///
    /// This is the only path that moves a property from unknown to known.
    pub fn update_property(&self, code: u16, value: f64) {
        tracing::trace!(module = %self.id, code, value, "property update");
        self.properties.update(code, value);
    }

    pub fn properties(&self) -> &PropertyCache {
        &self.properties
    }

    /// Enqueue a command for this module. Does not touch the cache.
    pub fn send(&self, command: Command) -> ModiResult<()> {
        self.commands.enqueue(command)
    }

    /// Enqueue a whole-record property write
    pub fn set_property(&self, property: u16, payload: Vec<i32>) -> ModiResult<()> {
        self.send(Command::set_property(self.id, property, payload))
    }

    /// Value to put on the wire for one field of a whole-record write:
    /// the supplied value, else the last known one, else zero.
    pub fn field_or_cached<P: PropertyCode>(&self, supplied: Option<i32>, property: P) -> i32 {
        supplied
            .or_else(|| self.get(property).map(|v| v.round() as i32))
            .unwrap_or(0)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Health report received
    pub fn mark_seen(&self, now: Instant) {
        *self.last_seen.lock() = now;
        self.connected.store(true, Ordering::Release);
    }

    pub fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::Release);
    }

    /// Construction time until the first health report
    pub fn last_seen(&self) -> Instant {
        *self.last_seen.lock()
    }

    pub fn version(&self) -> Option<FirmwareVersion> {
        *self.version.lock()
    }

    pub fn set_version(&self, version: FirmwareVersion) {
        *self.version.lock() = Some(version);
    }

    pub fn has_user_code(&self) -> bool {
        self.has_user_code.load(Ordering::Acquire)
    }

    /// Record that the module carries user code; true the first time only
    pub fn flag_user_code(&self) -> bool {
        !self.has_user_code.swap(true, Ordering::AcqRel)
    }
}

/// Generates a typed proxy struct around a shared [`ModuleCore`]
macro_rules! module_proxy {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            core: std::sync::Arc<$crate::ModuleCore>,
        }

        impl $name {
            pub(crate) fn from_core(core: std::sync::Arc<$crate::ModuleCore>) -> Self {
                $name { core }
            }

            pub fn core(&self) -> &$crate::ModuleCore {
                &self.core
            }

            #[inline]
            pub fn id(&self) -> modi_core::ModuleId {
                self.core.id()
            }

            #[inline]
            pub fn uuid(&self) -> Option<modi_core::ModuleUuid> {
                self.core.uuid()
            }
        }
    };
}

pub(crate) use module_proxy;

/// Any live module proxy
#[derive(Clone, Debug)]
pub enum Module {
    Env(Env),
    Gyro(Gyro),
    Mic(Mic),
    Button(Button),
    Dial(Dial),
    Ultrasonic(Ultrasonic),
    Ir(Ir),
    Display(Display),
    Motor(Motor),
    Led(Led),
    Speaker(Speaker),
    Network(Network),
}

macro_rules! module_variants {
    ($($variant:ident => $as_fn:ident, $into_fn:ident;)*) => {
        impl Module {
            pub fn core(&self) -> &ModuleCore {
                match self {
                    $(Module::$variant(m) => m.core(),)*
                }
            }

            $(
                pub fn $as_fn(&self) -> Option<&$variant> {
                    match self {
                        Module::$variant(m) => Some(m),
                        _ => None,
                    }
                }

                pub fn $into_fn(self) -> ModiResult<$variant> {
                    match self {
                        Module::$variant(m) => Ok(m),
                        other => Err(ModiError::WrongModuleType {
                            id: other.id(),
                            expected: ModuleType::$variant,
                            actual: other.module_type(),
                        }),
                    }
                }
            )*
        }

        $(
            impl From<$variant> for Module {
                fn from(m: $variant) -> Self {
                    Module::$variant(m)
                }
            }
        )*
    };
}

module_variants! {
    Env => as_env, try_into_env;
    Gyro => as_gyro, try_into_gyro;
    Mic => as_mic, try_into_mic;
    Button => as_button, try_into_button;
    Dial => as_dial, try_into_dial;
    Ultrasonic => as_ultrasonic, try_into_ultrasonic;
    Ir => as_ir, try_into_ir;
    Display => as_display, try_into_display;
    Motor => as_motor, try_into_motor;
    Led => as_led, try_into_led;
    Speaker => as_speaker, try_into_speaker;
    Network => as_network, try_into_network;
}

impl Module {
    #[inline]
    pub fn id(&self) -> ModuleId {
        self.core().id()
    }

    #[inline]
    pub fn uuid(&self) -> Option<ModuleUuid> {
        self.core().uuid()
    }

    #[inline]
    pub fn module_type(&self) -> ModuleType {
        self.core().module_type()
    }

    pub fn is_connected(&self) -> bool {
        self.core().is_connected()
    }

    /// True if both handles point at the same proxy
    pub fn same_proxy(&self, other: &Module) -> bool {
        std::ptr::eq(self.core(), other.core())
    }
}

/// Shared core handle, used by constructors
pub type CoreHandle = Arc<ModuleCore>;

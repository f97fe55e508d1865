//! Type dispatch - module type tag to proxy constructor
//!
//! The table is a plain value built once; lookups go by tag, never by name.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use modi_core::{
    resolve_type, CommandSink, ModiError, ModiResult, ModuleId, ModuleType, ModuleUuid,
};

use crate::{
    Button, ButtonProperty, CoreHandle, Dial, DialProperty, Display, Env, EnvProperty, Gyro,
    GyroProperty, Ir, IrProperty, Led, LedProperty, Mic, MicProperty, Module, ModuleCore, Motor,
    MotorProperty, Network, Speaker, SpeakerProperty, Ultrasonic, UltrasonicProperty,
};

/// Builds the typed proxy around a freshly created core
pub type ProxyFactory = fn(CoreHandle) -> Module;

/// Constructor and readable property codes of one module type
#[derive(Clone, Copy, Debug)]
pub struct FactoryEntry {
    pub constructor: ProxyFactory,
    pub properties: &'static [u16],
}

/// Module type to constructor table
#[derive(Clone, Debug, Default)]
pub struct FactoryTable {
    entries: HashMap<ModuleType, FactoryEntry>,
}

impl FactoryTable {
    /// Table with no constructors
    pub fn empty() -> Self {
        FactoryTable::default()
    }

    /// Table covering every module type
    pub fn new() -> Self {
        FactoryTable::empty()
            .with(ModuleType::Env, |c| Module::Env(Env::from_core(c)), EnvProperty::CODES)
            .with(ModuleType::Gyro, |c| Module::Gyro(Gyro::from_core(c)), GyroProperty::CODES)
            .with(ModuleType::Mic, |c| Module::Mic(Mic::from_core(c)), MicProperty::CODES)
            .with(
                ModuleType::Button,
                |c| Module::Button(Button::from_core(c)),
                ButtonProperty::CODES,
            )
            .with(ModuleType::Dial, |c| Module::Dial(Dial::from_core(c)), DialProperty::CODES)
            .with(
                ModuleType::Ultrasonic,
                |c| Module::Ultrasonic(Ultrasonic::from_core(c)),
                UltrasonicProperty::CODES,
            )
            .with(ModuleType::Ir, |c| Module::Ir(Ir::from_core(c)), IrProperty::CODES)
            .with(ModuleType::Display, |c| Module::Display(Display::from_core(c)), &[])
            .with(ModuleType::Motor, |c| Module::Motor(Motor::from_core(c)), MotorProperty::CODES)
            .with(ModuleType::Led, |c| Module::Led(Led::from_core(c)), LedProperty::CODES)
            .with(
                ModuleType::Speaker,
                |c| Module::Speaker(Speaker::from_core(c)),
                SpeakerProperty::CODES,
            )
            .with(ModuleType::Network, |c| Module::Network(Network::from_core(c)), &[])
    }

    /// Shared table covering every module type, built on first use
    pub fn standard() -> &'static FactoryTable {
        static STANDARD: OnceLock<FactoryTable> = OnceLock::new();
        STANDARD.get_or_init(FactoryTable::new)
    }

    pub fn with(
        mut self,
        module_type: ModuleType,
        constructor: ProxyFactory,
        properties: &'static [u16],
    ) -> Self {
        self.entries.insert(
            module_type,
            FactoryEntry {
                constructor,
                properties,
            },
        );
        self
    }

    pub fn without(mut self, module_type: ModuleType) -> Self {
        self.entries.remove(&module_type);
        self
    }

    pub fn entry(&self, module_type: ModuleType) -> ModiResult<&FactoryEntry> {
        self.entries
            .get(&module_type)
            .ok_or(ModiError::NoFactory(module_type))
    }

    pub fn constructor_for(&self, module_type: ModuleType) -> ModiResult<ProxyFactory> {
        self.entry(module_type).map(|e| e.constructor)
    }

    /// Readable property codes of a module type
    pub fn properties_of(&self, module_type: ModuleType) -> ModiResult<&'static [u16]> {
        self.entry(module_type).map(|e| e.properties)
    }

    /// Resolve the type of `uuid` and build its proxy
    pub fn build(
        &self,
        id: ModuleId,
        uuid: Option<ModuleUuid>,
        commands: CommandSink,
    ) -> ModiResult<Module> {
        let module_type = resolve_type(uuid);
        let constructor = self.constructor_for(module_type)?;
        let core = Arc::new(ModuleCore::new(id, uuid, module_type, commands));
        Ok(constructor(core))
    }
}

/// Constructor for `module_type` from the standard table
pub fn constructor_for(module_type: ModuleType) -> ModiResult<ProxyFactory> {
    FactoryTable::standard().constructor_for(module_type)
}

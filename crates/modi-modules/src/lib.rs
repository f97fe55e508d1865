//! MODI Modules - Typed proxies for the modules on the bus
//!
//! This crate implements the property exchange contract:
//! - `ModuleCore`: identity, property cache and command sink shared by all proxies
//! - Typed proxies with getters over the cache and setters onto the queue
//! - `Module`: the closed union of all proxy types
//! - `FactoryTable`: type tag to proxy constructor dispatch

pub mod module;
pub mod input;
pub mod led;
pub mod speaker;
pub mod output;
pub mod network;
pub mod factory;

pub use module::*;
pub use input::*;
pub use led::*;
pub use speaker::*;
pub use output::*;
pub use network::*;
pub use factory::*;

//! MODI Core - Fundamental types for the host-side module layer
//!
//! This crate defines the types shared by every other MODI crate:
//! - Identifiers (ModuleId, ModuleUuid)
//! - Module type tags and uuid-based type resolution
//! - Outbound commands and the shared command queue
//! - Firmware versions
//! - The per-module property cache
//! - Error types

pub mod id;
pub mod module_type;
pub mod command;
pub mod version;
pub mod property;
pub mod error;

pub use id::*;
pub use module_type::*;
pub use command::*;
pub use version::*;
pub use property::*;
pub use error::*;

//! Error types for the MODI host layer

use thiserror::Error;

use crate::{ModuleId, ModuleType};

/// Core MODI errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModiError {
    // Lookup errors
    #[error("No module with id {0} is connected")]
    ModuleNotFound(ModuleId),

    #[error("Unknown module type: {0}")]
    UnknownModuleType(String),

    #[error("No proxy constructor registered for module type {0}")]
    NoFactory(ModuleType),

    #[error("Module {id} is a {actual} module, not a {expected} module")]
    WrongModuleType {
        id: ModuleId,
        expected: ModuleType,
        actual: ModuleType,
    },

    // Queue errors
    #[error("Outbound command queue is closed")]
    QueueClosed,
}

/// Result type for MODI operations
pub type ModiResult<T> = Result<T, ModiError>;

//! Property cache - last known values reported by a module
//!
//! A slot is either unknown (never reported) or holds the last telemetry
//! value. Only the inbound telemetry path writes; any caller may read.

use std::collections::HashMap;

use parking_lot::RwLock;

/// A typed property code of one module type
pub trait PropertyCode: Copy {
    /// Numeric code understood by the firmware
    fn code(self) -> u16;
}

/// Cache of last known property values, keyed by property code
#[derive(Debug, Default)]
pub struct PropertyCache {
    values: RwLock<HashMap<u16, f64>>,
}

impl PropertyCache {
    pub fn new() -> Self {
        PropertyCache::default()
    }

    /// Last known value, or `None` if the module never reported it
    pub fn get(&self, code: u16) -> Option<f64> {
        self.values.read().get(&code).copied()
    }

    /// Record a telemetry value
    pub fn update(&self, code: u16, value: f64) {
        self.values.write().insert(code, value);
    }

    /// Forget a value, returning the slot to unknown
    pub fn invalidate(&self, code: u16) {
        self.values.write().remove(&code);
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }

    /// Number of known properties
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Copy of all known values
    pub fn snapshot(&self) -> HashMap<u16, f64> {
        self.values.read().clone()
    }
}

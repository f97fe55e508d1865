//! Identity types for MODI modules
//!
//! A module carries two identities: the short session id the network module
//! hands out on the bus, and the 48-bit hardware uuid burned in at the factory.

use std::fmt;

/// Session-local module id, used as the address of every command
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ModuleId(pub u16);

impl ModuleId {
    /// Broadcast address understood by every module on the bus
    pub const BROADCAST: ModuleId = ModuleId(0xFFF);

    #[inline]
    pub fn new(id: u16) -> Self {
        ModuleId(id)
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Module({:#05x})", self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

/// Hardware uuid of a module
/// Format: \[type:16\]\[serial:32\]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ModuleUuid(pub u64);

impl ModuleUuid {
    /// Width of a uuid on the wire
    pub const BITS: u32 = 48;

    const MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

    /// Create a uuid, truncating to 48 bits
    #[inline]
    pub fn new(uuid: u64) -> Self {
        ModuleUuid(uuid & Self::MASK)
    }

    /// Build a uuid from its type prefix and serial number
    #[inline]
    pub fn from_prefix_serial(prefix: u16, serial: u32) -> Self {
        ModuleUuid(((prefix as u64) << 32) | serial as u64)
    }

    /// Top 16 bits: the type indicator
    #[inline]
    pub fn type_prefix(self) -> u16 {
        (self.0 >> 32) as u16
    }

    #[inline]
    pub fn serial(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ModuleUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid({:04x}:{:08x})", self.type_prefix(), self.serial())
    }
}

impl fmt::Display for ModuleUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:012x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_prefix_serial() {
        let uuid = ModuleUuid::from_prefix_serial(0x4020, 0x1234_5678);
        assert_eq!(uuid.type_prefix(), 0x4020);
        assert_eq!(uuid.serial(), 0x1234_5678);
        assert_eq!(uuid.to_string(), "402012345678");
    }

    #[test]
    fn test_uuid_truncated_to_48_bits() {
        let uuid = ModuleUuid::new(0xFFFF_4020_0000_0001);
        assert_eq!(uuid.raw(), 0x4020_0000_0001);
        assert_eq!(uuid.type_prefix(), 0x4020);
    }

    #[test]
    fn test_module_id_ordering() {
        assert!(ModuleId::new(1) < ModuleId::new(2));
        assert_eq!(format!("{:?}", ModuleId::new(0x12)), "Module(0x012)");
    }
}

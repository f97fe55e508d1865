//! Firmware version reported by a module when it announces itself

use std::fmt;

/// Packed as \[major:3\]\[minor:5\]\[patch:8\]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl FirmwareVersion {
    pub fn new(major: u8, minor: u8, patch: u8) -> Self {
        FirmwareVersion {
            major: major & 0x07,
            minor: minor & 0x1F,
            patch,
        }
    }

    /// Decode the 16-bit version field
    pub fn from_raw(raw: u16) -> Self {
        FirmwareVersion::new((raw >> 13) as u8, (raw >> 8) as u8, raw as u8)
    }

    pub fn to_raw(self) -> u16 {
        ((self.major as u16) << 13) | ((self.minor as u16) << 8) | self.patch as u16
    }
}

impl fmt::Debug for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_layout() {
        let v = FirmwareVersion::from_raw(0x2203);
        assert_eq!(v, FirmwareVersion::new(1, 2, 3));
        assert_eq!(v.to_raw(), 0x2203);
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_ordering() {
        assert!(FirmwareVersion::new(1, 2, 3) < FirmwareVersion::new(1, 3, 0));
        assert!(FirmwareVersion::new(0, 31, 255) < FirmwareVersion::new(1, 0, 0));
    }
}

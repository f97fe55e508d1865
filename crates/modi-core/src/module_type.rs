//! Module type tags
//!
//! Every module on the bus belongs to one closed category. The category is
//! read from the type prefix of the hardware uuid:
//! - Input: env, gyro, mic, button, dial, ultrasonic, ir
//! - Output: display, motor, led, speaker
//! - Setup: network (the root of the chain)

use std::fmt;
use std::str::FromStr;

use crate::{ModiError, ModuleUuid};

/// Semantic module category
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ModuleType {
    Env,
    Gyro,
    Mic,
    Button,
    Dial,
    Ultrasonic,
    Ir,
    Display,
    Motor,
    Led,
    Speaker,
    /// Root of the chain; also the fallback for unrecognised uuids
    #[default]
    Network,
}

/// Module category family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModuleFamily {
    Input,
    Output,
    Setup,
}

impl ModuleType {
    pub const ALL: [ModuleType; 12] = [
        ModuleType::Env,
        ModuleType::Gyro,
        ModuleType::Mic,
        ModuleType::Button,
        ModuleType::Dial,
        ModuleType::Ultrasonic,
        ModuleType::Ir,
        ModuleType::Display,
        ModuleType::Motor,
        ModuleType::Led,
        ModuleType::Speaker,
        ModuleType::Network,
    ];

    /// Look up the type for a uuid prefix, if the prefix is known
    pub fn from_prefix(prefix: u16) -> Option<Self> {
        match prefix {
            0x2000 => Some(ModuleType::Env),
            0x2010 => Some(ModuleType::Gyro),
            0x2020 => Some(ModuleType::Mic),
            0x2030 => Some(ModuleType::Button),
            0x2040 => Some(ModuleType::Dial),
            0x2050 => Some(ModuleType::Ultrasonic),
            0x2060 => Some(ModuleType::Ir),
            0x4000 => Some(ModuleType::Display),
            0x4010 => Some(ModuleType::Motor),
            0x4020 => Some(ModuleType::Led),
            0x4030 => Some(ModuleType::Speaker),
            _ => None,
        }
    }

    /// Uuid prefix of this type (network modules have none)
    pub fn prefix(self) -> Option<u16> {
        match self {
            ModuleType::Env => Some(0x2000),
            ModuleType::Gyro => Some(0x2010),
            ModuleType::Mic => Some(0x2020),
            ModuleType::Button => Some(0x2030),
            ModuleType::Dial => Some(0x2040),
            ModuleType::Ultrasonic => Some(0x2050),
            ModuleType::Ir => Some(0x2060),
            ModuleType::Display => Some(0x4000),
            ModuleType::Motor => Some(0x4010),
            ModuleType::Led => Some(0x4020),
            ModuleType::Speaker => Some(0x4030),
            ModuleType::Network => None,
        }
    }

    /// Stable lowercase name
    pub fn name(self) -> &'static str {
        match self {
            ModuleType::Env => "env",
            ModuleType::Gyro => "gyro",
            ModuleType::Mic => "mic",
            ModuleType::Button => "button",
            ModuleType::Dial => "dial",
            ModuleType::Ultrasonic => "ultrasonic",
            ModuleType::Ir => "ir",
            ModuleType::Display => "display",
            ModuleType::Motor => "motor",
            ModuleType::Led => "led",
            ModuleType::Speaker => "speaker",
            ModuleType::Network => "network",
        }
    }

    pub fn family(self) -> ModuleFamily {
        match self {
            ModuleType::Env
            | ModuleType::Gyro
            | ModuleType::Mic
            | ModuleType::Button
            | ModuleType::Dial
            | ModuleType::Ultrasonic
            | ModuleType::Ir => ModuleFamily::Input,
            ModuleType::Display | ModuleType::Motor | ModuleType::Led | ModuleType::Speaker => {
                ModuleFamily::Output
            }
            ModuleType::Network => ModuleFamily::Setup,
        }
    }
}

/// Resolve the type of a module from its uuid.
///
/// Total: a missing uuid or an unknown prefix resolves to
/// [`ModuleType::Network`] so that unrecognised hardware still gets a proxy.
pub fn resolve_type(uuid: Option<ModuleUuid>) -> ModuleType {
    uuid.and_then(|u| ModuleType::from_prefix(u.type_prefix()))
        .unwrap_or(ModuleType::Network)
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModuleType {
    type Err = ModiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModiError::UnknownModuleType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_prefixes() {
        let led = ModuleUuid::from_prefix_serial(0x4020, 7);
        assert_eq!(resolve_type(Some(led)), ModuleType::Led);

        let env = ModuleUuid::from_prefix_serial(0x2000, 0xDEAD_BEEF);
        assert_eq!(resolve_type(Some(env)), ModuleType::Env);
    }

    #[test]
    fn test_null_and_unknown_resolve_to_network() {
        assert_eq!(resolve_type(None), ModuleType::Network);

        let unknown = ModuleUuid::from_prefix_serial(0x3000, 1);
        assert_eq!(resolve_type(Some(unknown)), ModuleType::Network);
        assert_eq!(resolve_type(Some(ModuleUuid::new(0))), ModuleType::Network);
    }

    #[test]
    fn test_prefix_table_roundtrip() {
        for t in ModuleType::ALL {
            match t.prefix() {
                Some(p) => assert_eq!(ModuleType::from_prefix(p), Some(t)),
                None => assert_eq!(t, ModuleType::Network),
            }
        }
    }

    #[test]
    fn test_every_prefix_resolves() {
        let known = (0..=u16::MAX)
            .map(|p| resolve_type(Some(ModuleUuid::from_prefix_serial(p, 0))))
            .filter(|t| *t != ModuleType::Network)
            .count();
        assert_eq!(known, 11);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("led".parse::<ModuleType>().unwrap(), ModuleType::Led);
        assert_eq!("Network".parse::<ModuleType>().unwrap(), ModuleType::Network);
        assert!(matches!(
            "toaster".parse::<ModuleType>(),
            Err(ModiError::UnknownModuleType(name)) if name == "toaster"
        ));
    }

    proptest! {
        #[test]
        fn prop_resolution_is_total(prefix in any::<u16>(), serial in any::<u32>()) {
            let uuid = ModuleUuid::from_prefix_serial(prefix, serial);
            let resolved = resolve_type(Some(uuid));
            match ModuleType::from_prefix(prefix) {
                Some(t) => prop_assert_eq!(resolved, t),
                None => prop_assert_eq!(resolved, ModuleType::Network),
            }
            // deterministic
            prop_assert_eq!(resolved, resolve_type(Some(uuid)));
        }
    }
}

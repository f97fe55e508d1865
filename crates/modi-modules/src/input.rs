//! Input module proxies
//!
//! Input modules are read-only from the host: every accessor is a cache
//! read and returns `None` until the module has reported the property.

use modi_core::PropertyCode;

use crate::module::module_proxy;

macro_rules! property_codes {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum $name {
            $($variant = $code),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
            pub const CODES: &'static [u16] = &[$($code),*];
        }

        impl PropertyCode for $name {
            #[inline]
            fn code(self) -> u16 {
                self as u16
            }
        }
    };
}

pub(crate) use property_codes;

property_codes! {
    /// Environment sensor properties
    EnvProperty {
        Brightness = 2,
        Red = 3,
        Green = 4,
        Blue = 5,
        Temperature = 6,
        Humidity = 7,
    }
}

property_codes! {
    GyroProperty {
        Roll = 2,
        Pitch = 3,
        Yaw = 4,
        AngularVelX = 5,
        AngularVelY = 6,
        AngularVelZ = 7,
        AccelerationX = 8,
        AccelerationY = 9,
        AccelerationZ = 10,
        Vibration = 11,
    }
}

property_codes! {
    MicProperty {
        Volume = 2,
        Frequency = 3,
    }
}

property_codes! {
    ButtonProperty {
        Clicked = 2,
        DoubleClicked = 3,
        Pressed = 4,
        Toggled = 5,
    }
}

property_codes! {
    DialProperty {
        Degree = 2,
        TurnSpeed = 3,
    }
}

property_codes! {
    UltrasonicProperty {
        Distance = 2,
    }
}

property_codes! {
    IrProperty {
        Proximity = 2,
    }
}

module_proxy! {
    /// Environment sensor: brightness, colour, temperature, humidity
    Env
}

impl Env {
    pub fn brightness(&self) -> Option<f64> {
        self.core().get(EnvProperty::Brightness)
    }

    pub fn red(&self) -> Option<f64> {
        self.core().get(EnvProperty::Red)
    }

    pub fn green(&self) -> Option<f64> {
        self.core().get(EnvProperty::Green)
    }

    pub fn blue(&self) -> Option<f64> {
        self.core().get(EnvProperty::Blue)
    }

    pub fn temperature(&self) -> Option<f64> {
        self.core().get(EnvProperty::Temperature)
    }

    pub fn humidity(&self) -> Option<f64> {
        self.core().get(EnvProperty::Humidity)
    }
}

module_proxy! {
    /// Gyroscope and accelerometer
    Gyro
}

impl Gyro {
    pub fn roll(&self) -> Option<f64> {
        self.core().get(GyroProperty::Roll)
    }

    pub fn pitch(&self) -> Option<f64> {
        self.core().get(GyroProperty::Pitch)
    }

    pub fn yaw(&self) -> Option<f64> {
        self.core().get(GyroProperty::Yaw)
    }

    /// Angular velocity around (x, y, z)
    pub fn angular_velocity(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (
            self.core().get(GyroProperty::AngularVelX),
            self.core().get(GyroProperty::AngularVelY),
            self.core().get(GyroProperty::AngularVelZ),
        )
    }

    /// Acceleration along (x, y, z)
    pub fn acceleration(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (
            self.core().get(GyroProperty::AccelerationX),
            self.core().get(GyroProperty::AccelerationY),
            self.core().get(GyroProperty::AccelerationZ),
        )
    }

    pub fn vibration(&self) -> Option<f64> {
        self.core().get(GyroProperty::Vibration)
    }
}

module_proxy! {
    Mic
}

impl Mic {
    pub fn volume(&self) -> Option<f64> {
        self.core().get(MicProperty::Volume)
    }

    pub fn frequency(&self) -> Option<f64> {
        self.core().get(MicProperty::Frequency)
    }
}

module_proxy! {
    Button
}

impl Button {
    pub fn clicked(&self) -> Option<bool> {
        self.flag(ButtonProperty::Clicked)
    }

    pub fn double_clicked(&self) -> Option<bool> {
        self.flag(ButtonProperty::DoubleClicked)
    }

    pub fn pressed(&self) -> Option<bool> {
        self.flag(ButtonProperty::Pressed)
    }

    pub fn toggled(&self) -> Option<bool> {
        self.flag(ButtonProperty::Toggled)
    }

    // firmware reports 100.0 for set, 0.0 for clear
    fn flag(&self, property: ButtonProperty) -> Option<bool> {
        self.core().get(property).map(|v| v != 0.0)
    }
}

module_proxy! {
    Dial
}

impl Dial {
    pub fn degree(&self) -> Option<f64> {
        self.core().get(DialProperty::Degree)
    }

    pub fn turn_speed(&self) -> Option<f64> {
        self.core().get(DialProperty::TurnSpeed)
    }
}

module_proxy! {
    Ultrasonic
}

impl Ultrasonic {
    pub fn distance(&self) -> Option<f64> {
        self.core().get(UltrasonicProperty::Distance)
    }
}

module_proxy! {
    /// Infrared proximity sensor
    Ir
}

impl Ir {
    pub fn proximity(&self) -> Option<f64> {
        self.core().get(IrProperty::Proximity)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ModuleCore;
    use modi_core::{CommandSink, ModuleId, ModuleType};

    fn core(module_type: ModuleType) -> Arc<ModuleCore> {
        let (sink, _rx) = CommandSink::channel();
        Arc::new(ModuleCore::new(ModuleId::new(1), None, module_type, sink))
    }

    #[test]
    fn test_env_reads_cache() {
        let env = Env::from_core(core(ModuleType::Env));
        assert_eq!(env.temperature(), None);

        env.core().update_property(EnvProperty::Temperature.code(), 23.5);
        env.core().update_property(EnvProperty::Humidity.code(), 40.0);

        assert_eq!(env.temperature(), Some(23.5));
        assert_eq!(env.humidity(), Some(40.0));
        assert_eq!(env.brightness(), None);
    }

    #[test]
    fn test_button_flags() {
        let button = Button::from_core(core(ModuleType::Button));
        assert_eq!(button.pressed(), None);

        button.core().update_property(ButtonProperty::Pressed.code(), 100.0);
        button.core().update_property(ButtonProperty::Clicked.code(), 0.0);

        assert_eq!(button.pressed(), Some(true));
        assert_eq!(button.clicked(), Some(false));
    }

    #[test]
    fn test_gyro_vectors() {
        let gyro = Gyro::from_core(core(ModuleType::Gyro));
        gyro.core().update_property(GyroProperty::AccelerationX.code(), 1.0);
        gyro.core().update_property(GyroProperty::AccelerationZ.code(), -9.8);

        assert_eq!(gyro.acceleration(), (Some(1.0), None, Some(-9.8)));
    }

    #[test]
    fn test_property_tables_have_unique_codes() {
        let codes: Vec<u16> = GyroProperty::ALL.iter().map(|p| p.code()).collect();
        let mut deduped = codes.clone();
        deduped.dedup();
        assert_eq!(codes, deduped);
        assert!(codes.iter().all(|c| *c > 1));
    }
}

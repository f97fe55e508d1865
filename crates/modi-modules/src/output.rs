//! Motor and display proxies
//!
//! Only the read side is modelled here; their write records are defined by
//! their own firmware tables.

use modi_core::PropertyCode;

use crate::input::property_codes;
use crate::module::module_proxy;

property_codes! {
    /// Dual-channel motor properties
    MotorProperty {
        FirstTorque = 2,
        FirstSpeed = 3,
        FirstDegree = 4,
        SecondTorque = 10,
        SecondSpeed = 11,
        SecondDegree = 12,
    }
}

module_proxy! {
    Motor
}

impl Motor {
    /// (first, second) torque
    pub fn torque(&self) -> (Option<f64>, Option<f64>) {
        (
            self.core().get(MotorProperty::FirstTorque),
            self.core().get(MotorProperty::SecondTorque),
        )
    }

    pub fn speed(&self) -> (Option<f64>, Option<f64>) {
        (
            self.core().get(MotorProperty::FirstSpeed),
            self.core().get(MotorProperty::SecondSpeed),
        )
    }

    pub fn degree(&self) -> (Option<f64>, Option<f64>) {
        (
            self.core().get(MotorProperty::FirstDegree),
            self.core().get(MotorProperty::SecondDegree),
        )
    }
}

module_proxy! {
    /// Display module; reports no readable properties
    Display
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ModuleCore;
    use modi_core::{CommandSink, ModuleId, ModuleType};

    #[test]
    fn test_motor_pairs() {
        let (sink, _rx) = CommandSink::channel();
        let core = ModuleCore::new(ModuleId::new(4), None, ModuleType::Motor, sink);
        let motor = Motor::from_core(Arc::new(core));

        motor.core().update_property(MotorProperty::SecondSpeed.code(), -50.0);
        assert_eq!(motor.speed(), (None, Some(-50.0)));
    }
}

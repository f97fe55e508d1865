//! LED module - the reference output proxy
//!
//! The LED firmware only accepts whole RGB records. A write that names a
//! single channel re-sends the other two at their last known values.

use modi_core::{ModiResult, PropertyCode, SET_PROPERTY_CODE};

use crate::input::property_codes;
use crate::module::module_proxy;

property_codes! {
    /// LED colour channels
    LedProperty {
        Red = 2,
        Green = 3,
        Blue = 4,
    }
}

/// Last known (red, green, blue); `None` for channels never reported
pub type Rgb = (Option<f64>, Option<f64>, Option<f64>);

/// Channel ceiling
pub const LED_MAX: u8 = 255;

module_proxy! {
    /// RGB LED
    Led
}

impl Led {
    pub fn red(&self) -> Option<f64> {
        self.core().get(LedProperty::Red)
    }

    pub fn green(&self) -> Option<f64> {
        self.core().get(LedProperty::Green)
    }

    pub fn blue(&self) -> Option<f64> {
        self.core().get(LedProperty::Blue)
    }

    pub fn rgb(&self) -> Rgb {
        (self.red(), self.green(), self.blue())
    }

    /// Set any subset of channels in one command.
    ///
    /// Omitted channels are sent at their cached value. With every channel
    /// omitted nothing is enqueued. Returns the cached colour, which does
    /// not reflect this write until the module reports it back.
    pub fn set_rgb(
        &self,
        red: Option<u8>,
        green: Option<u8>,
        blue: Option<u8>,
    ) -> ModiResult<Rgb> {
        if red.is_some() || green.is_some() || blue.is_some() {
            let core = self.core();
            let payload = vec![
                core.field_or_cached(red.map(i32::from), LedProperty::Red),
                core.field_or_cached(green.map(i32::from), LedProperty::Green),
                core.field_or_cached(blue.map(i32::from), LedProperty::Blue),
            ];
            core.set_property(SET_PROPERTY_CODE, payload)?;
        }
        Ok(self.rgb())
    }

    pub fn set_red(&self, red: u8) -> ModiResult<Option<f64>> {
        self.set_rgb(Some(red), None, None)?;
        Ok(self.red())
    }

    pub fn set_green(&self, green: u8) -> ModiResult<Option<f64>> {
        self.set_rgb(None, Some(green), None)?;
        Ok(self.green())
    }

    pub fn set_blue(&self, blue: u8) -> ModiResult<Option<f64>> {
        self.set_rgb(None, None, Some(blue))?;
        Ok(self.blue())
    }

    /// Full brightness white
    pub fn set_on(&self) -> ModiResult<Rgb> {
        self.set_rgb(Some(LED_MAX), Some(LED_MAX), Some(LED_MAX))
    }

    pub fn set_off(&self) -> ModiResult<Rgb> {
        self.set_rgb(Some(0), Some(0), Some(0))
    }
}

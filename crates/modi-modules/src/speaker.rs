//! Speaker module
//!
//! Frequency and volume travel together in one record, with the same
//! cached-value fill-in as the LED.

use modi_core::{ModiResult, PropertyCode, SET_PROPERTY_CODE};

use crate::input::property_codes;
use crate::module::module_proxy;

property_codes! {
    SpeakerProperty {
        Volume = 2,
        Frequency = 3,
    }
}

module_proxy! {
    Speaker
}

impl Speaker {
    pub fn volume(&self) -> Option<f64> {
        self.core().get(SpeakerProperty::Volume)
    }

    pub fn frequency(&self) -> Option<f64> {
        self.core().get(SpeakerProperty::Frequency)
    }

    /// Set frequency (Hz) and/or volume (0-100) in one command.
    ///
    /// Returns the cached (frequency, volume).
    pub fn set_tune(
        &self,
        frequency: Option<u16>,
        volume: Option<u8>,
    ) -> ModiResult<(Option<f64>, Option<f64>)> {
        if frequency.is_some() || volume.is_some() {
            let core = self.core();
            let payload = vec![
                core.field_or_cached(frequency.map(i32::from), SpeakerProperty::Frequency),
                core.field_or_cached(volume.map(i32::from), SpeakerProperty::Volume),
            ];
            core.set_property(SET_PROPERTY_CODE, payload)?;
        }
        Ok((self.frequency(), self.volume()))
    }

    pub fn set_frequency(&self, frequency: u16) -> ModiResult<Option<f64>> {
        self.set_tune(Some(frequency), None)?;
        Ok(self.frequency())
    }

    pub fn set_volume(&self, volume: u8) -> ModiResult<Option<f64>> {
        self.set_tune(None, Some(volume))?;
        Ok(self.volume())
    }

    pub fn set_off(&self) -> ModiResult<(Option<f64>, Option<f64>)> {
        self.set_tune(None, Some(0))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ModuleCore;
    use modi_core::{CommandSink, ModuleId, ModuleType};

    #[test]
    fn test_set_volume_keeps_frequency() {
        let (sink, mut rx) = CommandSink::channel();
        let core = ModuleCore::new(ModuleId::new(2), None, ModuleType::Speaker, sink);
        let speaker = Speaker::from_core(Arc::new(core));

        speaker
            .core()
            .update_property(SpeakerProperty::Frequency.code(), 440.0);
        speaker.set_volume(80).unwrap();
        speaker.set_tune(None, None).unwrap();

        assert_eq!(rx.try_recv().unwrap().payload, vec![440, 80]);
        assert!(rx.try_recv().is_err());
        assert_eq!(speaker.volume(), None);
    }
}

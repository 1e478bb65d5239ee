//! Ambient temperature
//!
//! The last known temperature is a plain atomic: writers store, readers load,
//! and nobody is promised a fresh value.

use core::sync::atomic::{AtomicI16, Ordering};

use embassy_sync::channel::DynamicReceiver;

use crate::config::DEFAULT_TEMPERATURE_TENTHS;
use crate::sensor::TemperatureUpdate;

/// Last known ambient temperature in tenths of a degree Celsius
#[derive(Debug)]
pub struct AmbientTemperature(AtomicI16);

impl AmbientTemperature {
    pub const fn new(tenths: i16) -> Self {
        Self(AtomicI16::new(tenths))
    }

    pub fn get(&self) -> i16 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, tenths: i16) {
        self.0.store(tenths, Ordering::Relaxed);
    }
}

impl Default for AmbientTemperature {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE_TENTHS)
    }
}

/// Non-blocking pickup of temperature updates
pub struct TemperatureIngest<'a> {
    ambient: &'a AmbientTemperature,
    updates: DynamicReceiver<'a, TemperatureUpdate>,
}

impl<'a> TemperatureIngest<'a> {
    pub fn new(ambient: &'a AmbientTemperature, updates: DynamicReceiver<'a, TemperatureUpdate>) -> Self {
        Self { ambient, updates }
    }

    /// Drains pending updates, stores the newest and returns the temperature to use.
    ///
    /// An empty channel leaves the last known value in place.
    pub fn refresh(&self) -> i16 {
        let mut newest = None;
        while let Ok(update) = self.updates.try_receive() {
            newest = Some(update.tenths());
        }
        if let Some(tenths) = newest {
            if tenths != self.ambient.get() {
                info!("ambient temperature now {} (0.1 C)", tenths);
            }
            self.ambient.set(tenths);
        }
        self.ambient.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;

    #[test]
    fn keeps_last_known_value_without_updates() {
        let ambient = AmbientTemperature::default();
        let updates = Channel::<NoopRawMutex, TemperatureUpdate, 2>::new();
        let ingest = TemperatureIngest::new(&ambient, updates.dyn_receiver());

        assert_eq!(ingest.refresh(), 260);
        assert_eq!(ingest.refresh(), 260);
    }

    #[test]
    fn newest_update_wins() {
        let ambient = AmbientTemperature::default();
        let updates = Channel::<NoopRawMutex, TemperatureUpdate, 4>::new();
        let ingest = TemperatureIngest::new(&ambient, updates.dyn_receiver());

        updates.try_send(TemperatureUpdate::from_tenths(270)).unwrap();
        updates.try_send(TemperatureUpdate::from_tenths(-35)).unwrap();
        assert_eq!(ingest.refresh(), -35);
        assert_eq!(ambient.get(), -35);
        assert!(updates.is_empty());
    }

    #[test]
    fn direct_writes_are_visible() {
        let ambient = AmbientTemperature::new(0);
        ambient.set(215);
        assert_eq!(ambient.get(), 215);
    }
}

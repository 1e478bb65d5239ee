//! System Channels
//!
//! Readings leave the ultrasonic array through one channel, temperature updates
//! come in through another. Both are bounded; neither side ever waits for long.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, DynamicReceiver, DynamicSender};
use ultrasonic_ranging::{Reading, TemperatureUpdate};

/// Distance readings, one per sensor per cycle, capacity of 8 (two full cycles)
pub static READING_CHANNEL: Channel<CriticalSectionRawMutex, Reading, 8> = Channel::new();

/// Ambient temperature updates for the speed of sound model
pub static TEMPERATURE_CHANNEL: Channel<CriticalSectionRawMutex, TemperatureUpdate, 2> = Channel::new();

/// Sending end handed to the measurement cycle
pub fn reading_sender() -> DynamicSender<'static, Reading> {
    READING_CHANNEL.dyn_sender()
}

/// Receives the next distance reading
pub async fn wait_reading() -> Reading {
    READING_CHANNEL.receive().await
}

/// Receiving end handed to the temperature ingest
pub fn temperature_receiver() -> DynamicReceiver<'static, TemperatureUpdate> {
    TEMPERATURE_CHANNEL.dyn_receiver()
}

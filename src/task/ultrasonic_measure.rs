//! Ultrasonic measurement
//!
//! Runs the round-robin measurement cycle over the four rangefinders.
//!
//! # Sensor Operation
//! - Front, rear, left, right in fixed order, one at a time on the shared capture timer
//! - 10 µs trigger pulse, then sleep until the echo completes or the capture window closes
//! - 10 ms pause after each sensor so stray echoes die out
//! - Distances in millimeters, 0 when nothing answered
//!
//! # Temperature
//! - The newest temperature update is picked up before each cycle
//! - All four conversions of a cycle use that same value

use embassy_time::Delay;
use ultrasonic_ranging::{MeasurementCycle, RangingConfig, TemperatureIngest};

use crate::system::{event, resources::UltrasonicBank, state::AMBIENT_TEMPERATURE};

/// Measurement worker task, never returns
#[embassy_executor::task]
pub async fn ultrasonic_measure(bank: &'static UltrasonicBank) {
    let temperature = TemperatureIngest::new(&AMBIENT_TEMPERATURE, event::temperature_receiver());
    let mut cycle = MeasurementCycle::new(
        bank,
        Delay,
        event::reading_sender(),
        temperature,
        RangingConfig::default(),
    );
    cycle.run_forever().await
}

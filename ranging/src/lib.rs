//! Ultrasonic ranging core
//!
//! Hardware independent part of the four-sensor ultrasonic array: the per-sensor
//! echo state machine, the bank that shares one capture timer between all sensors,
//! the round-robin measurement cycle and the speed-of-sound model.
//!
//! The firmware binds real pins, the capture timer and the channels; everything in
//! here only sees `embedded-hal` traits, [`CaptureTimer`] and `embassy-sync` primitives.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod bank;
pub mod config;
pub mod cycle;
pub mod echo;
pub mod error;
pub mod sensor;
pub mod sound;
pub mod temperature;

#[cfg(test)]
mod testing;

pub use bank::SensorBank;
pub use config::RangingConfig;
pub use cycle::{CycleSummary, MeasurementCycle};
pub use echo::{CaptureTimer, EchoMachine, EchoOutcome, EchoState};
pub use error::RangingError;
pub use sensor::{Reading, Sensor, TemperatureUpdate};
pub use temperature::{AmbientTemperature, TemperatureIngest};

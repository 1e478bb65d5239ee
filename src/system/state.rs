//! System State
//!
//! Last known ambient temperature, written by the temperature ingest at the start
//! of each measurement cycle and read for every distance conversion of that cycle.
//! It is a single atomic: no freshness guarantee, the last stored value wins.

use ultrasonic_ranging::config::DEFAULT_TEMPERATURE_TENTHS;
use ultrasonic_ranging::AmbientTemperature;

/// Ambient temperature in tenths of a degree Celsius, 26.0 °C until told otherwise
pub static AMBIENT_TEMPERATURE: AmbientTemperature = AmbientTemperature::new(DEFAULT_TEMPERATURE_TENTHS);

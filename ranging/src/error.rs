//! Ranging errors
//!
//! None of these are fatal. The cycle turns each of them into a zero reading
//! or a dropped reading for one sensor and carries on.

use crate::sensor::Sensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangingError {
    /// The sensor was asked to arm or trigger while not idle
    NotIdle(Sensor),
    /// The shared capture hardware still belongs to another sensor's measurement
    Busy(Sensor),
    /// Driving the trigger line failed
    Trigger(Sensor),
    /// The outbound channel stayed full for the whole publish timeout
    ReadingDropped(Sensor),
}

impl RangingError {
    /// Sensor the error is about
    pub const fn sensor(&self) -> Sensor {
        match *self {
            RangingError::NotIdle(s)
            | RangingError::Busy(s)
            | RangingError::Trigger(s)
            | RangingError::ReadingDropped(s) => s,
        }
    }
}

//! Timing configuration for the measurement cycle

/// Default ambient temperature, 26.0 °C in tenths of a degree
pub const DEFAULT_TEMPERATURE_TENTHS: i16 = 260;

/// Timing knobs of the measurement cycle.
///
/// The defaults match an HC-SR04 class sensor array; the capture window itself
/// is a property of the capture hardware and not configured here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangingConfig {
    /// Width of the trigger pulse in microseconds
    pub trigger_pulse_us: u32,
    /// Pause after each sensor so its echoes die out before the next ping (ms)
    pub settle_delay_ms: u32,
    /// How long a reading may wait for room in the outbound channel (ms)
    pub publish_timeout_ms: u32,
    /// Delay before the first cycle so the other peripherals can come up (ms)
    pub startup_delay_ms: u32,
}

impl Default for RangingConfig {
    fn default() -> Self {
        Self {
            trigger_pulse_us: 10,
            settle_delay_ms: 10,
            publish_timeout_ms: 5,
            startup_delay_ms: 250,
        }
    }
}

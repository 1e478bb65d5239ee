//! Speed of sound model
//!
//! Integer-only conversion from echo time to distance. All divisions truncate.
//!
//! # Model
//! - Dry air: 331.3 m/s at 0 °C plus 0.606 m/s per whole degree Celsius
//! - Humidity: 17 mm/s subtracted per started 100 m/s, roughly 40 % relative humidity
//! - Temperatures below absolute zero are clamped so the function stays total

/// Dry-air speed of sound at 0 °C (mm/s)
pub const DRY_AIR_SPEED_AT_ZERO_MM_S: i32 = 331_300;

/// Speed increase per whole degree Celsius (mm/s)
pub const SPEED_PER_DEGREE_MM_S: i32 = 606;

/// Humidity correction, applied per 100_000 mm/s of dry-air speed (mm/s)
pub const HUMIDITY_CORRECTION_MM_S: u32 = 17;

const ABSOLUTE_ZERO_CELSIUS: i32 = -273;

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Speed of sound in millimeters per second for a temperature in tenths of a degree Celsius.
///
/// The temperature is truncated to whole degrees before it enters the linear model.
/// Over -40.0..80.0 °C the result stays within about 307_000..380_000 mm/s, and within
/// about 330_000..350_000 mm/s over 0..30 °C.
pub fn speed_mm_per_s(temperature_tenths: i16) -> u32 {
    let degrees = (i32::from(temperature_tenths) / 10).max(ABSOLUTE_ZERO_CELSIUS);
    // positive for every clamped input
    let dry = (DRY_AIR_SPEED_AT_ZERO_MM_S + SPEED_PER_DEGREE_MM_S * degrees) as u32;
    dry - (dry / 100_000) * HUMIDITY_CORRECTION_MM_S
}

/// One-way distance in millimeters for a round-trip echo time.
///
/// Saturates at `u16::MAX`; far beyond anything the capture window can produce.
pub fn time_of_flight_to_distance(elapsed_us: u32, temperature_tenths: i16) -> u16 {
    let speed = u64::from(speed_mm_per_s(temperature_tenths));
    let round_trip_mm = u64::from(elapsed_us) * speed / MICROS_PER_SECOND;
    u16::try_from(round_trip_mm / 2).unwrap_or(u16::MAX)
}

/// Converts capture timer ticks to microseconds, saturating at `u32::MAX`.
///
/// A zero tick frequency yields 0, i.e. a no-echo reading.
pub fn ticks_to_micros(ticks: u32, tick_hz: u32) -> u32 {
    if tick_hz == 0 {
        return 0;
    }
    let micros = u64::from(ticks) * MICROS_PER_SECOND / u64::from(tick_hz);
    u32::try_from(micros).unwrap_or(u32::MAX)
}

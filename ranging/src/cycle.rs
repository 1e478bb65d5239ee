//! Measurement Cycle
//!
//! Round-robin scheduler over the sensor bank. Each cycle:
//! 1. picks up the newest ambient temperature (non-blocking) and holds it for the whole cycle
//! 2. for Front, Rear, Left, Right in turn: arm, pulse the trigger line, sleep until the
//!    echo finished or the capture window overflowed, convert, publish
//! 3. waits a short settle time after each sensor so old echoes die out
//!
//! # Failure handling
//! - Overflow, a failed trigger line or a protocol violation turn into a 0 mm reading
//!   for that sensor in that cycle; the next cycle triggers it as usual
//! - A reading that finds the outbound channel full for the whole publish timeout is dropped

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::DynamicSender;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::bank::SensorBank;
use crate::config::RangingConfig;
use crate::echo::{CaptureTimer, EchoOutcome};
use crate::error::RangingError;
use crate::sensor::{Reading, Sensor};
use crate::sound;
use crate::temperature::TemperatureIngest;

/// What happened during one pass over all sensors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleSummary {
    /// Temperature used for every conversion of the cycle (0.1 °C)
    pub temperature_tenths: i16,
    /// Sensors that returned an echo
    pub echoes: u8,
    /// Sensors that reported 0 mm
    pub no_echo: u8,
    /// Readings lost to a full outbound channel
    pub dropped: u8,
}

/// Worker side of the ultrasonic array
pub struct MeasurementCycle<'a, M: RawMutex, P, C, D> {
    bank: &'a SensorBank<M, P, C>,
    delay: D,
    readings: DynamicSender<'a, Reading>,
    temperature: TemperatureIngest<'a>,
    config: RangingConfig,
}

impl<'a, M, P, C, D> MeasurementCycle<'a, M, P, C, D>
where
    M: RawMutex,
    P: OutputPin,
    C: CaptureTimer,
    D: DelayNs,
{
    pub fn new(
        bank: &'a SensorBank<M, P, C>,
        delay: D,
        readings: DynamicSender<'a, Reading>,
        temperature: TemperatureIngest<'a>,
        config: RangingConfig,
    ) -> Self {
        Self {
            bank,
            delay,
            readings,
            temperature,
            config,
        }
    }

    /// Worker entry point, never returns
    pub async fn run_forever(&mut self) -> ! {
        info!("ultrasonic ranging started, {} sensors", Sensor::COUNT);
        self.delay.delay_ms(self.config.startup_delay_ms).await;
        loop {
            let summary = self.run_cycle().await;
            debug!(
                "cycle at {} (0.1 C): {} echoes, {} misses, {} dropped",
                summary.temperature_tenths,
                summary.echoes,
                summary.no_echo,
                summary.dropped
            );
        }
    }

    /// One pass over all sensors in fixed order
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let temperature_tenths = self.temperature.refresh();
        let mut summary = CycleSummary {
            temperature_tenths,
            ..CycleSummary::default()
        };

        for sensor in Sensor::ALL {
            let reading = self.measure(sensor, temperature_tenths).await;
            if reading.is_no_echo() {
                summary.no_echo += 1;
            } else {
                summary.echoes += 1;
            }

            if let Err(error) = self.publish(reading).await {
                warn!("{}: reading dropped", error.sensor());
                summary.dropped += 1;
            }

            self.delay.delay_ms(self.config.settle_delay_ms).await;
        }
        summary
    }

    /// Measures one sensor and converts the echo with the given temperature
    pub async fn measure(&mut self, sensor: Sensor, temperature_tenths: i16) -> Reading {
        if let Err(error) = self.trigger(sensor).await {
            warn!("{}: not measured: {}", sensor, error);
            self.bank.record_result(sensor, 0, 0);
            return Reading::no_echo(sensor);
        }

        self.bank.wait_terminal(sensor).await;

        let (echo_us, distance_mm) = match self.bank.acknowledge(sensor) {
            Some(EchoOutcome::Echo { ticks }) => {
                let echo_us = sound::ticks_to_micros(ticks, self.bank.tick_hz());
                (echo_us, sound::time_of_flight_to_distance(echo_us, temperature_tenths))
            }
            Some(EchoOutcome::NoEcho) => {
                info!("{}: no echo", sensor);
                (0, 0)
            }
            None => {
                warn!("{}: measurement ended without a result", sensor);
                (0, 0)
            }
        };

        self.bank.record_result(sensor, echo_us, distance_mm);
        Reading { sensor, distance_mm }
    }

    /// Arms `sensor` and sends the trigger pulse
    async fn trigger(&mut self, sensor: Sensor) -> Result<(), RangingError> {
        self.bank.arm(sensor)?;
        self.bank.assert_trigger(sensor)?;
        self.delay.delay_us(self.config.trigger_pulse_us).await;
        self.bank.deassert_trigger(sensor)?;
        self.bank.mark_triggered(sensor)
    }

    /// Queues a reading, giving up after the publish timeout
    async fn publish(&mut self, reading: Reading) -> Result<(), RangingError> {
        match select(
            self.readings.send(reading),
            self.delay.delay_ms(self.config.publish_timeout_ms),
        )
        .await
        {
            Either::First(()) => Ok(()),
            Either::Second(()) => Err(RangingError::ReadingDropped(reading.sensor)),
        }
    }
}

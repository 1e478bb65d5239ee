//! Echo Capture
//!
//! Stands in for the input-capture interrupt of the shared timer.
//!
//! # Operation
//! - Arming a sensor wakes this task and starts the capture window
//! - Every edge on the armed sensor's echo pin is reported to the bank; the echo
//!   state machine decides whether it was the rising or the falling edge
//! - If the echo has not completed when the window closes, an overflow is reported
//! - Re-arming during a window abandons it and starts over for the new sensor
//!
//! The counter runs on the embassy time driver, so one tick is `1 / TICK_HZ` seconds.

use defmt::{info, trace};
use embassy_futures::select::{select3, Either3};
use embassy_rp::gpio::Input;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer, TICK_HZ};
use ultrasonic_ranging::{CaptureTimer, Sensor};

use crate::system::resources::{EchoInputs, UltrasonicBank};

/// Longest echo the capture accepts. An HC-SR04 holds its echo line for about 38ms
/// when nothing answers, so anything past this is a miss.
///
/// Edges are seen through `wait_for_any_edge`, which is only listening while this task
/// is polled. A falling edge that arrives before the task waits again after the rising
/// edge is not reported as an edge; the echo line level sampled after each edge covers
/// that case. A pulse shorter than the task's wake-up latency still latches a count
/// that is too long by that latency.
const CAPTURE_WINDOW: Duration = Duration::from_millis(50);

/// Raised by [`EchoCapture::arm`] with the sensor whose echo pin to watch
static ARMED: Signal<CriticalSectionRawMutex, Sensor> = Signal::new();

/// Shared capture counter, backed by the embassy time driver
pub struct EchoCapture {
    base: Instant,
}

impl EchoCapture {
    pub fn new() -> Self {
        Self { base: Instant::now() }
    }
}

impl Default for EchoCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureTimer for EchoCapture {
    fn tick_hz(&self) -> u32 {
        TICK_HZ as u32
    }

    fn arm(&mut self, sensor: Sensor) {
        self.base = Instant::now();
        ARMED.signal(sensor);
    }

    fn reset_counter(&mut self) {
        self.base = Instant::now();
    }

    fn read_capture(&mut self, _sensor: Sensor) -> u32 {
        let elapsed = Instant::now().saturating_duration_since(self.base);
        u32::try_from(elapsed.as_ticks()).unwrap_or(u32::MAX)
    }
}

/// Capture task, reports edges and overflows of the armed sensor to the bank
#[embassy_executor::task]
pub async fn echo_capture(mut echoes: EchoInputs, bank: &'static UltrasonicBank) {
    info!("Echo capture started, window {} ms", CAPTURE_WINDOW.as_millis());

    let mut armed = ARMED.wait().await;
    loop {
        armed = match watch_echo(&mut echoes[armed.index()], bank).await {
            Some(rearmed) => rearmed,
            None => ARMED.wait().await,
        };
    }
}

/// Follows one capture window. Returns the next sensor if the bank re-armed early.
async fn watch_echo(echo: &mut Input<'static>, bank: &'static UltrasonicBank) -> Option<Sensor> {
    let deadline = Instant::now() + CAPTURE_WINDOW;
    loop {
        match select3(echo.wait_for_any_edge(), Timer::at(deadline), ARMED.wait()).await {
            Either3::First(()) => {
                let state = bank.on_capture_edge_sampled(echo.is_high());
                trace!("echo edge, {} now {}", bank.current(), state);
                if state.is_terminal() {
                    return None;
                }
            }
            Either3::Second(()) => {
                bank.on_capture_overflow();
                return None;
            }
            Either3::Third(sensor) => return Some(sensor),
        }
    }
}

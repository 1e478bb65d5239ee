//! Sensor Bank
//!
//! Owns the four device records and the single capture timer they share.
//!
//! # Hand-off protocol
//! - The worker arms one sensor at a time. Arming stores the sensor in an atomic
//!   selector, and the interrupt-side handlers attribute every capture event to
//!   whichever sensor that selector names.
//! - The selector only moves once the previous holder is back in `Idle`, so the
//!   interrupt side never sees a half-finished hand-off.
//! - Reaching `Finished` or `Overflow` raises a signal the worker sleeps on; the
//!   capture window overflow bounds how long that sleep can take.
//!
//! Records sit behind a blocking mutex so the interrupt handlers and the worker
//! never touch a record at the same time.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::OutputPin;

use crate::echo::{CaptureTimer, EchoMachine, EchoOutcome, EchoState};
use crate::error::RangingError;
use crate::sensor::Sensor;

/// Everything the bank knows about one sensor
struct DeviceRecord<P> {
    trigger: P,
    echo: EchoMachine,
    last_echo_us: u32,
    last_distance_mm: u16,
}

impl<P> DeviceRecord<P> {
    fn new(sensor: Sensor, trigger: P) -> Self {
        Self {
            trigger,
            echo: EchoMachine::new(sensor),
            last_echo_us: 0,
            last_distance_mm: 0,
        }
    }
}

struct Devices<P, C> {
    records: [DeviceRecord<P>; Sensor::COUNT],
    capture: C,
}

/// Four ultrasonic sensors on one shared capture timer
pub struct SensorBank<M: RawMutex, P, C> {
    devices: Mutex<M, RefCell<Devices<P, C>>>,
    current: AtomicU8,
    terminal: Signal<M, Sensor>,
}

impl<M: RawMutex, P: OutputPin, C: CaptureTimer> SensorBank<M, P, C> {
    /// Binds one trigger line per sensor (in [`Sensor::ALL`] order) and the shared
    /// capture timer. Every sensor starts out idle with the selector on the front sensor.
    pub fn new(triggers: [P; Sensor::COUNT], capture: C) -> Self {
        let [front, rear, left, right] = triggers;
        Self {
            devices: Mutex::new(RefCell::new(Devices {
                records: [
                    DeviceRecord::new(Sensor::Front, front),
                    DeviceRecord::new(Sensor::Rear, rear),
                    DeviceRecord::new(Sensor::Left, left),
                    DeviceRecord::new(Sensor::Right, right),
                ],
                capture,
            })),
            current: AtomicU8::new(Sensor::Front as u8),
            terminal: Signal::new(),
        }
    }

    fn with_devices<R>(&self, f: impl FnOnce(&mut Devices<P, C>) -> R) -> R {
        self.devices.lock(|devices| f(&mut devices.borrow_mut()))
    }

    /// Sensor the capture events are currently attributed to
    pub fn current(&self) -> Sensor {
        Sensor::from_index(usize::from(self.current.load(Ordering::Acquire))).unwrap_or(Sensor::Front)
    }

    pub fn state(&self, sensor: Sensor) -> EchoState {
        self.with_devices(|devices| devices.records[sensor.index()].echo.state())
    }

    /// Frequency of the shared capture counter
    pub fn tick_hz(&self) -> u32 {
        self.with_devices(|devices| devices.capture.tick_hz())
    }

    /// Hands the capture hardware to `sensor`.
    ///
    /// Both the sensor and the previous holder of the capture hardware must be idle.
    /// No state changes here; the machine moves to `Triggered` once the pulse is out.
    pub fn arm(&self, sensor: Sensor) -> Result<(), RangingError> {
        self.with_devices(|devices| {
            if devices.records[sensor.index()].echo.state() != EchoState::Idle {
                return Err(RangingError::NotIdle(sensor));
            }
            let holder = self.current();
            if devices.records[holder.index()].echo.state() != EchoState::Idle {
                return Err(RangingError::Busy(holder));
            }
            self.current.store(sensor as u8, Ordering::Release);
            self.terminal.reset();
            devices.capture.arm(sensor);
            Ok(())
        })
    }

    /// Drives the sensor's trigger line high
    pub fn assert_trigger(&self, sensor: Sensor) -> Result<(), RangingError> {
        self.with_devices(|devices| devices.records[sensor.index()].trigger.set_high())
            .map_err(|_| RangingError::Trigger(sensor))
    }

    /// Drives the sensor's trigger line low
    pub fn deassert_trigger(&self, sensor: Sensor) -> Result<(), RangingError> {
        self.with_devices(|devices| devices.records[sensor.index()].trigger.set_low())
            .map_err(|_| RangingError::Trigger(sensor))
    }

    /// Records that the trigger pulse went out, `Idle -> Triggered`
    pub fn mark_triggered(&self, sensor: Sensor) -> Result<(), RangingError> {
        self.with_devices(|devices| devices.records[sensor.index()].echo.trigger())
    }

    /// Edge captured for `sensor`.
    ///
    /// Resets the counter on the rising edge and latches it on the falling edge.
    pub fn capture_event(&self, sensor: Sensor) -> EchoState {
        let state = self.with_devices(|devices| {
            let Devices { records, capture } = devices;
            records[sensor.index()].echo.on_edge(capture)
        });
        if state.is_terminal() {
            self.terminal.signal(sensor);
        }
        state
    }

    /// Capture window overflow for `sensor`
    pub fn overflow_event(&self, sensor: Sensor) -> EchoState {
        let state = self.with_devices(|devices| devices.records[sensor.index()].echo.on_overflow());
        if state.is_terminal() {
            self.terminal.signal(sensor);
        }
        state
    }

    /// Capture interrupt entry point, attributes the edge to the armed sensor
    pub fn on_capture_edge(&self) -> EchoState {
        self.capture_event(self.current())
    }

    /// Capture entry point for edge sources that can lose an edge while busy.
    ///
    /// `line_high` is the echo line sampled as the edge is handled. A line
    /// already low while `Measuring` means the falling edge came and went before the
    /// source could wait for it again, so it is delivered here. The latched count is
    /// then a little late rather than the reading being lost to an overflow.
    pub fn on_capture_edge_sampled(&self, line_high: bool) -> EchoState {
        let state = self.on_capture_edge();
        if state == EchoState::Measuring && !line_high {
            trace!("{}: falling edge recovered from line level", self.current());
            return self.on_capture_edge();
        }
        state
    }

    /// Overflow interrupt entry point, attributes the overflow to the armed sensor
    pub fn on_capture_overflow(&self) -> EchoState {
        self.overflow_event(self.current())
    }

    /// Sleeps until `sensor` leaves `Triggered`/`Measuring` and returns the state it reached.
    ///
    /// Returns immediately for a sensor that is not pending.
    pub async fn wait_terminal(&self, sensor: Sensor) -> EchoState {
        loop {
            let state = self.state(sensor);
            if !state.is_pending() {
                return state;
            }
            self.terminal.wait().await;
        }
    }

    /// Collects a finished or overflowed measurement and returns the sensor to `Idle`
    pub fn acknowledge(&self, sensor: Sensor) -> Option<EchoOutcome> {
        self.with_devices(|devices| devices.records[sensor.index()].echo.acknowledge())
    }

    /// Stores the converted result of the last measurement
    pub fn record_result(&self, sensor: Sensor, echo_us: u32, distance_mm: u16) {
        self.with_devices(|devices| {
            let record = &mut devices.records[sensor.index()];
            record.last_echo_us = echo_us;
            record.last_distance_mm = distance_mm;
        });
    }

    /// Echo width of the last measurement in microseconds, 0 after a miss
    pub fn last_echo_us(&self, sensor: Sensor) -> u32 {
        self.with_devices(|devices| devices.records[sensor.index()].last_echo_us)
    }

    /// Distance of the last measurement in millimeters, 0 after a miss
    pub fn last_distance_mm(&self, sensor: Sensor) -> u16 {
        self.with_devices(|devices| devices.records[sensor.index()].last_distance_mm)
    }
}

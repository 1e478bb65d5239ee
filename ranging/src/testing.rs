//! Test doubles for pins, the capture timer and delays

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::echo::CaptureTimer;
use crate::sensor::Sensor;

/// Capture timer whose latched values are scripted per sensor
#[derive(Debug, Default)]
pub(crate) struct FakeTimer {
    pub ticks: [u32; Sensor::COUNT],
    pub armed: Vec<Sensor>,
    pub resets: usize,
}

impl CaptureTimer for FakeTimer {
    fn tick_hz(&self) -> u32 {
        1_000_000
    }

    fn arm(&mut self, sensor: Sensor) {
        self.armed.push(sensor);
    }

    fn reset_counter(&mut self) {
        self.resets += 1;
    }

    fn read_capture(&mut self, sensor: Sensor) -> u32 {
        self.ticks[sensor.index()]
    }
}

/// Handle to a [`FakeTimer`] the test keeps after moving a clone into the bank
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedTimer(pub Rc<RefCell<FakeTimer>>);

impl SharedTimer {
    pub fn set_ticks(&self, sensor: Sensor, ticks: u32) {
        self.0.borrow_mut().ticks[sensor.index()] = ticks;
    }

    pub fn armed(&self) -> Vec<Sensor> {
        self.0.borrow().armed.clone()
    }

    pub fn resets(&self) -> usize {
        self.0.borrow().resets
    }
}

impl CaptureTimer for SharedTimer {
    fn tick_hz(&self) -> u32 {
        self.0.borrow().tick_hz()
    }

    fn arm(&mut self, sensor: Sensor) {
        self.0.borrow_mut().arm(sensor);
    }

    fn reset_counter(&mut self) {
        self.0.borrow_mut().reset_counter();
    }

    fn read_capture(&mut self, sensor: Sensor) -> u32 {
        self.0.borrow_mut().read_capture(sensor)
    }
}

#[derive(Debug)]
pub(crate) struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Trigger pin that records every level change as `(sensor, high)`
#[derive(Debug, Clone)]
pub(crate) struct FakePin {
    sensor: Sensor,
    log: Rc<RefCell<Vec<(Sensor, bool)>>>,
    faulty: bool,
}

impl ErrorType for FakePin {
    type Error = PinFault;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push((self.sensor, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.faulty {
            return Err(PinFault);
        }
        self.log.borrow_mut().push((self.sensor, true));
        Ok(())
    }
}

/// One pin per sensor sharing a single level log
pub(crate) fn fake_pins() -> ([FakePin; Sensor::COUNT], Rc<RefCell<Vec<(Sensor, bool)>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let pin = |sensor| FakePin {
        sensor,
        log: log.clone(),
        faulty: false,
    };
    let pins = [pin(Sensor::Front), pin(Sensor::Rear), pin(Sensor::Left), pin(Sensor::Right)];
    (pins, log)
}

/// Same as [`fake_pins`] but `faulty` cannot be driven high
pub(crate) fn fake_pins_with_fault(faulty: Sensor) -> [FakePin; Sensor::COUNT] {
    let (mut pins, _) = fake_pins();
    pins[faulty.index()].faulty = true;
    pins
}

/// Delay that completes immediately and sums up what was requested
#[derive(Debug, Default)]
pub(crate) struct NoDelay {
    pub total_ns: u64,
    pub requests: Vec<u32>,
}

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.requests.push(ns);
    }
}

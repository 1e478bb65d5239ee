//! Echo State Machine
//!
//! Tracks one sensor through a single measurement.
//!
//! # Transitions
//! - `Idle -> Triggered`: the scheduler finished the trigger pulse
//! - `Triggered -> Measuring`: first captured edge (rising); the capture counter is reset
//! - `Measuring -> Finished`: second captured edge (falling); the counter value is latched
//! - `Triggered | Measuring -> Overflow`: the capture window ran out
//! - `Finished | Overflow -> Idle`: the scheduler collected the result
//!
//! Edges carry no polarity: the current state alone decides whether an edge is
//! the rising or the falling one. Edges and overflows outside `Triggered`/`Measuring`
//! are ignored so a stray edge cannot leak into the next sensor's measurement.

use crate::error::RangingError;
use crate::sensor::Sensor;

/// The shared input-capture hardware.
///
/// One instance serves all sensors. Edge and overflow events are delivered by
/// whatever owns the capture interrupt; this trait covers the register side only.
pub trait CaptureTimer {
    /// Counter frequency in Hz
    fn tick_hz(&self) -> u32;

    /// Routes the capture input of `sensor` to the counter and enables capture events
    fn arm(&mut self, sensor: Sensor);

    /// Restarts counting from zero
    fn reset_counter(&mut self);

    /// Ticks counted since the last reset, as latched for `sensor`'s channel
    fn read_capture(&mut self, sensor: Sensor) -> u32;
}

/// Measurement progress of a single sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EchoState {
    /// Not measuring
    Idle,
    /// Trigger pulse sent, waiting for the echo to start
    Triggered,
    /// Echo line high, waiting for it to drop
    Measuring,
    /// Echo captured, result waiting to be collected
    Finished,
    /// Capture window ran out before the echo completed
    Overflow,
}

impl EchoState {
    /// Finished or overflowed, the scheduler may collect the result
    pub const fn is_terminal(self) -> bool {
        matches!(self, EchoState::Finished | EchoState::Overflow)
    }

    /// Waiting on the capture hardware
    pub const fn is_pending(self) -> bool {
        matches!(self, EchoState::Triggered | EchoState::Measuring)
    }
}

/// Result of one measurement, collected when the machine returns to idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EchoOutcome {
    /// Echo pulse width in capture ticks
    Echo { ticks: u32 },
    /// No complete echo inside the capture window
    NoEcho,
}

/// Per-sensor echo state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoMachine {
    sensor: Sensor,
    state: EchoState,
    capture: u32,
}

impl EchoMachine {
    pub const fn new(sensor: Sensor) -> Self {
        Self {
            sensor,
            state: EchoState::Idle,
            capture: 0,
        }
    }

    pub const fn state(&self) -> EchoState {
        self.state
    }

    /// Raw tick count latched by the last falling edge
    pub const fn capture(&self) -> u32 {
        self.capture
    }

    /// Marks the trigger pulse as sent
    pub fn trigger(&mut self) -> Result<(), RangingError> {
        if self.state != EchoState::Idle {
            return Err(RangingError::NotIdle(self.sensor));
        }
        self.state = EchoState::Triggered;
        Ok(())
    }

    /// Handles a captured edge and returns the state afterwards
    pub fn on_edge<C: CaptureTimer + ?Sized>(&mut self, timer: &mut C) -> EchoState {
        match self.state {
            EchoState::Triggered => {
                // measure from the rising edge on
                timer.reset_counter();
                self.state = EchoState::Measuring;
            }
            EchoState::Measuring => {
                self.capture = timer.read_capture(self.sensor);
                self.state = EchoState::Finished;
            }
            state => {
                trace!("{}: stray edge ignored in {}", self.sensor, state);
            }
        }
        self.state
    }

    /// Handles a capture window overflow and returns the state afterwards
    pub fn on_overflow(&mut self) -> EchoState {
        if self.state.is_pending() {
            self.state = EchoState::Overflow;
        } else {
            trace!("{}: overflow ignored in {}", self.sensor, self.state);
        }
        self.state
    }

    /// Collects a finished measurement and returns to idle.
    ///
    /// `None` while the machine is idle or still waiting on the hardware.
    pub fn acknowledge(&mut self) -> Option<EchoOutcome> {
        let outcome = match self.state {
            EchoState::Finished => EchoOutcome::Echo { ticks: self.capture },
            EchoState::Overflow => EchoOutcome::NoEcho,
            _ => return None,
        };
        self.state = EchoState::Idle;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTimer;

    #[test]
    fn full_echo_sequence() {
        let mut timer = FakeTimer::default();
        timer.ticks[Sensor::Left.index()] = 5800;
        let mut machine = EchoMachine::new(Sensor::Left);

        machine.trigger().unwrap();
        assert_eq!(machine.state(), EchoState::Triggered);
        assert_eq!(machine.on_edge(&mut timer), EchoState::Measuring);
        assert_eq!(timer.resets, 1);
        assert_eq!(machine.on_edge(&mut timer), EchoState::Finished);
        assert_eq!(machine.capture(), 5800);

        assert_eq!(machine.acknowledge(), Some(EchoOutcome::Echo { ticks: 5800 }));
        assert_eq!(machine.state(), EchoState::Idle);
    }

    #[test]
    fn events_while_idle_are_ignored() {
        let mut timer = FakeTimer::default();
        let mut machine = EchoMachine::new(Sensor::Front);

        assert_eq!(machine.on_edge(&mut timer), EchoState::Idle);
        assert_eq!(machine.on_overflow(), EchoState::Idle);
        assert_eq!(timer.resets, 0);
        assert_eq!(machine.acknowledge(), None);
    }

    #[test]
    fn overflow_from_either_pending_state() {
        let mut timer = FakeTimer::default();
        let mut machine = EchoMachine::new(Sensor::Rear);

        machine.trigger().unwrap();
        assert_eq!(machine.on_overflow(), EchoState::Overflow);
        assert_eq!(machine.acknowledge(), Some(EchoOutcome::NoEcho));

        machine.trigger().unwrap();
        machine.on_edge(&mut timer);
        assert_eq!(machine.on_overflow(), EchoState::Overflow);
        assert_eq!(machine.acknowledge(), Some(EchoOutcome::NoEcho));
        assert_eq!(machine.state(), EchoState::Idle);
    }

    #[test]
    fn terminal_state_is_held_until_acknowledged() {
        let mut timer = FakeTimer::default();
        timer.ticks[Sensor::Right.index()] = 100;
        let mut machine = EchoMachine::new(Sensor::Right);

        machine.trigger().unwrap();
        machine.on_edge(&mut timer);
        machine.on_edge(&mut timer);

        // a third edge or a late overflow must not disturb the latched value
        timer.ticks[Sensor::Right.index()] = 999;
        assert_eq!(machine.on_edge(&mut timer), EchoState::Finished);
        assert_eq!(machine.on_overflow(), EchoState::Finished);
        assert_eq!(machine.capture(), 100);
        assert_eq!(machine.trigger(), Err(RangingError::NotIdle(Sensor::Right)));
    }

    #[test]
    fn pending_machine_cannot_be_acknowledged() {
        let mut machine = EchoMachine::new(Sensor::Front);
        machine.trigger().unwrap();
        assert_eq!(machine.acknowledge(), None);
        assert_eq!(machine.state(), EchoState::Triggered);
    }
}

//! Hardware Resource Management
//!
//! Assigns pins to the ultrasonic array and builds the sensor bank.
//!
//! # Resource Groups
//! - Ultrasonic array: one trigger and one echo pin per HC-SR04 sensor
//!
//! # Shared Resources
//! The sensor bank is shared by the measurement task and the capture task. It lives
//! in a static cell and is handed out as a `'static` reference; its records are
//! guarded by a critical-section mutex inside the bank.

use assign_resources::assign_resources;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;
use ultrasonic_ranging::{Sensor, SensorBank};

use crate::task::echo_capture::EchoCapture;

/// The four sensors with their trigger lines and the shared capture timer
pub type UltrasonicBank = SensorBank<CriticalSectionRawMutex, Output<'static>, EchoCapture>;

/// Echo inputs in [`Sensor::ALL`] order
pub type EchoInputs = [Input<'static>; Sensor::COUNT];

static SENSOR_BANK: StaticCell<UltrasonicBank> = StaticCell::new();

/// Builds the sensor bank with every sensor idle.
///
/// This must only be called once during system initialization in main.rs,
/// before any tasks are spawned.
pub fn init_sensor_bank(r: UltrasonicResources) -> (&'static UltrasonicBank, EchoInputs) {
    let triggers = [
        Output::new(r.front_trigger, Level::Low),
        Output::new(r.rear_trigger, Level::Low),
        Output::new(r.left_trigger, Level::Low),
        Output::new(r.right_trigger, Level::Low),
    ];
    // The echo lines are driven push-pull by the sensors, no pull needed
    let echoes = [
        Input::new(r.front_echo, Pull::None),
        Input::new(r.rear_echo, Pull::None),
        Input::new(r.left_echo, Pull::None),
        Input::new(r.right_echo, Pull::None),
    ];
    let bank = SENSOR_BANK.init(SensorBank::new(triggers, EchoCapture::new()));
    (bank, echoes)
}

assign_resources! {
    /// HC-SR04 ultrasonic sensor pins, front, rear, left, right
    ultrasonic: UltrasonicResources {
        front_trigger: PIN_2,
        front_echo: PIN_3,
        rear_trigger: PIN_4,
        rear_echo: PIN_5,
        left_trigger: PIN_6,
        left_echo: PIN_7,
        right_trigger: PIN_8,
        right_echo: PIN_9,
    },
}

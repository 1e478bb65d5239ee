//! Ultrasonic array firmware entry point
//!
//! Binds the four rangefinders to their pins and spawns the capture, measurement
//! and reporting tasks.

#![no_std]
#![no_main]

use crate::task::{echo_capture::echo_capture, reading_report::reading_report, ultrasonic_measure::ultrasonic_measure};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use system::resources::{self, AssignedResources, UltrasonicResources};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// System core modules
mod system;
/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // Split the resources into separate groups for each task
    let r = split_resources!(p);

    // The bank must exist before either side of the capture hand-off runs:
    // trigger lines go into the bank, echo inputs go to the capture task.
    let (bank, echoes) = resources::init_sensor_bank(r.ultrasonic);

    // Capture side first, so the first arming is never missed
    spawner.spawn(echo_capture(echoes, bank)).unwrap();
    spawner.spawn(ultrasonic_measure(bank)).unwrap();
    spawner.spawn(reading_report()).unwrap();
}

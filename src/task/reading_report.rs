//! Reading report
//!
//! Logs every published distance reading over RTT. Useful during bring-up and
//! keeps the reading channel flowing while no other consumer is attached.

use defmt::{info, warn};

use crate::system::event;

#[embassy_executor::task]
pub async fn reading_report() {
    loop {
        let reading = event::wait_reading().await;
        if reading.is_no_echo() {
            warn!("{}: no echo", reading.sensor);
        } else {
            info!("{}: {} mm", reading.sensor, reading.distance_mm);
        }
    }
}

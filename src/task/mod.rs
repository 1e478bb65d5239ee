pub mod echo_capture;
pub mod reading_report;
pub mod ultrasonic_measure;

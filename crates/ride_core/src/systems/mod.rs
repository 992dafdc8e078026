pub mod driver_telemetry;
pub mod progress_tick;
pub mod transition;

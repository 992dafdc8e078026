pub mod booking;
pub mod clock;
pub mod config;
pub mod ecs;
pub mod error;
pub mod estimates;
pub mod geo;
pub mod location;
pub mod observer;
pub mod presentation;
pub mod pricing;
pub mod runner;
pub mod session;
pub mod status;
pub mod systems;
pub mod telemetry;
pub mod tracker;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

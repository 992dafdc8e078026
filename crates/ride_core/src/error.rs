use thiserror::Error;

use crate::status::RideStatus;

/// Errors raised by the ride lifecycle.
///
/// None of these are fatal: the tracker logs them, leaves the session as it
/// was, and (for location failures) keeps tracking without position updates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RideError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: RideStatus, to: RideStatus },

    #[error("ride is already {0}")]
    AlreadyTerminal(RideStatus),

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("unknown ride: {0}")]
    UnknownRide(String),
}

/// Errors raised while loading or validating a [`crate::config::TrackerConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Errors raised by the booking flow before a session exists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    #[error("pickup and destination must differ")]
    SamePickupAndDestination,

    #[error("address must not be empty")]
    EmptyAddress,
}

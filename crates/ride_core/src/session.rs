//! The ride session handed from the booking flow to the tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::booking::DriverProfile;
use crate::ecs::DriverPosition;
use crate::estimates::RideEstimates;
use crate::geo::Place;
use crate::status::RideStatus;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RideId(pub String);

impl RideId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id in the `ride-<millis>` shape the booking screen navigates to.
    pub fn from_timestamp_ms(ms: u64) -> Self {
        Self(format!("ride-{ms}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One rider-driver pairing, from request to completion or cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideSession {
    pub id: RideId,
    pub status: RideStatus,
    pub driver: DriverProfile,
    pub driver_position: DriverPosition,
    pub pickup: Place,
    pub destination: Place,
    /// Filled in by the tracker; `None` until the session is tracked.
    pub estimates: Option<RideEstimates>,
    /// Simulation time (ms) the ride entered `InProgress`.
    pub start_time: Option<u64>,
}

impl RideSession {
    /// A freshly requested ride with the driver at their last known location.
    pub fn new(id: RideId, driver: DriverProfile, pickup: Place, destination: Place) -> Self {
        let driver_position = DriverPosition::at(driver.location);
        Self {
            id,
            status: RideStatus::Requested,
            driver,
            driver_position,
            pickup,
            destination,
            estimates: None,
            start_time: None,
        }
    }
}

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::booking::DriverProfile;
use crate::estimates::RideEstimates;
use crate::geo::{GeoPoint, Place};
use crate::session::RideId;
use crate::status::RideStatus;

/// Immutable part of a tracked ride, fixed when the booking is confirmed.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Ride {
    pub id: RideId,
    pub driver: DriverProfile,
    pub pickup: Place,
    pub destination: Place,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Status(pub RideStatus);

/// Driver marker on the map. Written only by the telemetry system while the
/// ride is tracked and the driver is moving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Component)]
pub struct DriverPosition {
    pub point: GeoPoint,
    /// Degrees clockwise from north, in `[0, 360)`.
    pub heading_deg: f64,
}

impl DriverPosition {
    pub fn at(point: GeoPoint) -> Self {
        Self {
            point,
            heading_deg: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Component)]
pub struct RideTiming {
    /// Simulation time when tracking started.
    pub requested_at: u64,
    pub accepted_at: Option<u64>,
    /// Set once, when the ride enters `InProgress`.
    pub start_time: Option<u64>,
    pub completed_at: Option<u64>,
    pub cancelled_at: Option<u64>,
    /// Last time anything about the ride changed (status or position).
    pub last_updated_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Estimates(pub RideEstimates);

/// Marker: the progression driver is running for this ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Tracking;

/// Non-blocking banner raised when the location feed fails. Cleared by the
/// next successful position update.
#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct LocationBanner(pub String);

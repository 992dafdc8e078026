//! Ride status machine.
//!
//! The happy path is a straight line from [`RideStatus::Requested`] to
//! [`RideStatus::Completed`]; every non-terminal status may also escape to
//! [`RideStatus::Cancelled`]. Nothing leaves a terminal status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RideError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RideStatus {
    Requested,
    Accepted,
    ArrivingAtPickup,
    #[serde(alias = "pickup")]
    AtPickup,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub const ALL: [RideStatus; 7] = [
        RideStatus::Requested,
        RideStatus::Accepted,
        RideStatus::ArrivingAtPickup,
        RideStatus::AtPickup,
        RideStatus::InProgress,
        RideStatus::Completed,
        RideStatus::Cancelled,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }

    /// The single forward target on the happy path, `None` for terminal statuses.
    pub fn next(self) -> Option<RideStatus> {
        match self {
            RideStatus::Requested => Some(RideStatus::Accepted),
            RideStatus::Accepted => Some(RideStatus::ArrivingAtPickup),
            RideStatus::ArrivingAtPickup => Some(RideStatus::AtPickup),
            RideStatus::AtPickup => Some(RideStatus::InProgress),
            RideStatus::InProgress => Some(RideStatus::Completed),
            RideStatus::Completed | RideStatus::Cancelled => None,
        }
    }

    pub fn can_transition_to(self, target: RideStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == RideStatus::Cancelled || self.next() == Some(target)
    }

    /// Statuses during which the driver marker moves and telemetry is applied.
    pub fn driver_is_moving(self) -> bool {
        matches!(
            self,
            RideStatus::Accepted | RideStatus::ArrivingAtPickup | RideStatus::InProgress
        )
    }

    /// Statuses during which the driver is still heading to the pickup.
    pub fn awaiting_pickup(self) -> bool {
        matches!(
            self,
            RideStatus::Requested | RideStatus::Accepted | RideStatus::ArrivingAtPickup
        )
    }

    /// Wire label, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            RideStatus::Requested => "requested",
            RideStatus::Accepted => "accepted",
            RideStatus::ArrivingAtPickup => "arriving-at-pickup",
            RideStatus::AtPickup => "at-pickup",
            RideStatus::InProgress => "in-progress",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(RideStatus::Requested),
            "accepted" => Ok(RideStatus::Accepted),
            "arriving-at-pickup" => Ok(RideStatus::ArrivingAtPickup),
            "at-pickup" | "pickup" => Ok(RideStatus::AtPickup),
            "in-progress" => Ok(RideStatus::InProgress),
            "completed" => Ok(RideStatus::Completed),
            "cancelled" => Ok(RideStatus::Cancelled),
            other => Err(format!("unknown ride status: {other}")),
        }
    }
}

/// Validates `current -> target` against the transition table.
pub fn transition(current: RideStatus, target: RideStatus) -> Result<RideStatus, RideError> {
    if current.can_transition_to(target) {
        Ok(target)
    } else {
        Err(RideError::InvalidTransition {
            from: current,
            to: target,
        })
    }
}

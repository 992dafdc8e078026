//! What the tracking screen shows for a ride.
//!
//! [`display_binding`] is the static part: a pure function of the status.
//! [`RideView`] layers the per-ride details (ETA, start time, banner) on top.

use serde::Serialize;

use crate::estimates::PickupEta;
use crate::session::RideSession;
use crate::status::RideStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RideAction {
    Cancel,
    Call,
    Message,
    Rate,
    Receipt,
    Rebook,
}

const EN_ROUTE_ACTIONS: &[RideAction] = &[RideAction::Cancel, RideAction::Call, RideAction::Message];
const ON_BOARD_ACTIONS: &[RideAction] = &[RideAction::Call, RideAction::Message];
const COMPLETED_ACTIONS: &[RideAction] = &[RideAction::Rate, RideAction::Receipt];
const CANCELLED_ACTIONS: &[RideAction] = &[RideAction::Rebook];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayBinding {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub color_token: &'static str,
    pub badge: &'static str,
    pub enabled_actions: &'static [RideAction],
}

impl DisplayBinding {
    pub fn allows(&self, action: RideAction) -> bool {
        self.enabled_actions.contains(&action)
    }
}

pub fn display_binding(status: RideStatus) -> DisplayBinding {
    match status {
        RideStatus::Requested => DisplayBinding {
            title: "Finding your driver",
            subtitle: "Waiting for the driver to accept",
            color_token: "bg-muted",
            badge: "requested",
            enabled_actions: EN_ROUTE_ACTIONS,
        },
        RideStatus::Accepted => DisplayBinding {
            title: "Driver is on the way",
            subtitle: "Your driver accepted the ride",
            color_token: "bg-blue-500",
            badge: "accepted",
            enabled_actions: EN_ROUTE_ACTIONS,
        },
        RideStatus::ArrivingAtPickup => DisplayBinding {
            title: "Driver is almost there",
            subtitle: "Head to the pickup location",
            color_token: "bg-blue-500",
            badge: "arriving",
            enabled_actions: EN_ROUTE_ACTIONS,
        },
        RideStatus::AtPickup => DisplayBinding {
            title: "Driver has arrived",
            subtitle: "Please come to the pickup location",
            color_token: "bg-primary",
            badge: "pickup",
            enabled_actions: EN_ROUTE_ACTIONS,
        },
        RideStatus::InProgress => DisplayBinding {
            title: "Ride in progress",
            subtitle: "Enjoy your ride",
            color_token: "bg-green-500",
            badge: "in progress",
            enabled_actions: ON_BOARD_ACTIONS,
        },
        RideStatus::Completed => DisplayBinding {
            title: "Ride completed",
            subtitle: "Thank you for riding with us!",
            color_token: "bg-gray-500",
            badge: "completed",
            enabled_actions: COMPLETED_ACTIONS,
        },
        RideStatus::Cancelled => DisplayBinding {
            title: "Ride cancelled",
            subtitle: "You can book another ride",
            color_token: "bg-destructive",
            badge: "cancelled",
            enabled_actions: CANCELLED_ACTIONS,
        },
    }
}

/// Formats simulation time (ms) as `HH:MM:SS`.
pub fn format_sim_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{hours:02}:{mins:02}:{secs:02}")
}

/// Everything the tracking screen needs to render one ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideView {
    pub session: RideSession,
    pub binding: DisplayBinding,
    /// Subtitle with per-ride details filled in.
    pub detail: String,
    pub show_route: bool,
    pub driver_moving: bool,
    pub location_banner: Option<String>,
    pub last_updated_at: u64,
}

impl RideView {
    pub fn compose(session: RideSession, location_banner: Option<String>, last_updated_at: u64) -> Self {
        let status = session.status;
        let binding = display_binding(status);
        let detail = match (status, session.estimates.map(|e| e.pickup_eta), session.start_time) {
            (RideStatus::Accepted | RideStatus::ArrivingAtPickup, Some(PickupEta::Minutes(mins)), _) => {
                format!("Arriving in {mins} min")
            }
            (RideStatus::InProgress, _, Some(start)) => {
                format!("Started at {}", format_sim_clock(start))
            }
            _ => binding.subtitle.to_string(),
        };

        Self {
            binding,
            detail,
            show_route: status == RideStatus::InProgress,
            driver_moving: status.driver_is_moving(),
            location_banner,
            last_updated_at,
            session,
        }
    }

    pub fn status(&self) -> RideStatus {
        self.session.status
    }
}

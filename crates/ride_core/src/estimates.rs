//! Derived display fields: pickup ETA, trip duration and fare.
//!
//! Recomputed whenever a session changes status; never written by anything
//! else, so the values only ever reflect the latest status and position.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::pricing::{calculate_trip_fare, FareBreakdown, PricingConfig};
use crate::status::RideStatus;

pub const ONE_MIN_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EstimateConfig {
    /// Average urban motorcycle speed used for ETA and duration.
    pub average_speed_kmh: f64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: 24.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupEta {
    Minutes(u32),
    Arrived,
    /// Rider is already on board, or the ride has ended.
    NotApplicable,
}

impl PickupEta {
    pub fn label(&self) -> String {
        match self {
            PickupEta::Minutes(mins) => format!("{mins} min"),
            PickupEta::Arrived => "Arrived".to_string(),
            PickupEta::NotApplicable => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RideEstimates {
    pub pickup_eta: PickupEta,
    pub trip_duration_mins: u32,
    pub fare: FareBreakdown,
}

/// Slowest average speed a config may set.
pub const MIN_SPEED_KMH: f64 = 1.0;

pub fn travel_time_secs(distance_km: f64, speed_kmh: f64) -> u64 {
    let hours = distance_km.max(0.0) / speed_kmh.max(MIN_SPEED_KMH);
    (hours * 60.0 * 60.0).round() as u64
}

/// Whole minutes, rounded up, never below one.
pub fn ceil_minutes(secs: u64) -> u32 {
    let mins = secs.div_ceil(ONE_MIN_SECS).max(1);
    u32::try_from(mins).unwrap_or(u32::MAX)
}

pub fn compute_estimates(
    status: RideStatus,
    driver: GeoPoint,
    pickup: GeoPoint,
    destination: GeoPoint,
    pricing: &PricingConfig,
    config: &EstimateConfig,
) -> RideEstimates {
    let pickup_eta = match status {
        RideStatus::Requested | RideStatus::Accepted | RideStatus::ArrivingAtPickup => {
            let secs = travel_time_secs(driver.distance_km(pickup), config.average_speed_kmh);
            PickupEta::Minutes(ceil_minutes(secs))
        }
        RideStatus::AtPickup => PickupEta::Arrived,
        RideStatus::InProgress | RideStatus::Completed | RideStatus::Cancelled => {
            PickupEta::NotApplicable
        }
    };
    let trip_secs = travel_time_secs(pickup.distance_km(destination), config.average_speed_kmh);

    RideEstimates {
        pickup_eta,
        trip_duration_mins: ceil_minutes(trip_secs),
        fare: calculate_trip_fare(pickup, destination, pricing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> (GeoPoint, GeoPoint, GeoPoint) {
        (
            GeoPoint::new(40.7128, -74.006),
            GeoPoint::new(40.712, -74.005),
            GeoPoint::new(40.75, -74.02),
        )
    }

    #[test]
    fn eta_depends_on_status() {
        let (driver, pickup, destination) = points();
        let pricing = PricingConfig::default();
        let config = EstimateConfig::default();

        let accepted = compute_estimates(RideStatus::Accepted, driver, pickup, destination, &pricing, &config);
        assert_eq!(accepted.pickup_eta, PickupEta::Minutes(1));

        let at_pickup = compute_estimates(RideStatus::AtPickup, driver, pickup, destination, &pricing, &config);
        assert_eq!(at_pickup.pickup_eta, PickupEta::Arrived);
        assert_eq!(at_pickup.pickup_eta.label(), "Arrived");

        let riding = compute_estimates(RideStatus::InProgress, driver, pickup, destination, &pricing, &config);
        assert_eq!(riding.pickup_eta, PickupEta::NotApplicable);
        assert_eq!(riding.trip_duration_mins, accepted.trip_duration_mins);
    }

    #[test]
    fn travel_time_scales_with_distance() {
        assert_eq!(travel_time_secs(12.0, 24.0), 1800);
        assert_eq!(ceil_minutes(1800), 30);
        assert_eq!(ceil_minutes(61), 2);
        assert_eq!(ceil_minutes(0), 1);
    }
}

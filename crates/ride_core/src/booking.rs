//! Booking flow: pick a nearby driver and turn the selection into a session.
//!
//! Driver profiles come from a [`DriverDirectory`] that callers inject; the
//! in-memory directory ships with the demo fleet.

use serde::{Deserialize, Serialize};

use crate::error::BookingError;
use crate::estimates::{ceil_minutes, travel_time_secs, EstimateConfig};
use crate::geo::{GeoPoint, Place};
use crate::session::{RideId, RideSession};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    pub id: String,
    pub name: String,
    pub rating: f32,
    pub phone: String,
    pub vehicle_model: String,
    pub license_plate: String,
    /// Last known location, used as the initial marker position.
    pub location: GeoPoint,
}

/// A driver offer as listed on the booking screen.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyDriver {
    pub profile: DriverProfile,
    pub distance_km: f64,
    pub eta_mins: u32,
}

/// Source of driver profiles. Implementations must be `Send + Sync` so a
/// directory can be shared with the tracker.
pub trait DriverDirectory: Send + Sync {
    fn get(&self, driver_id: &str) -> Option<DriverProfile>;

    fn all(&self) -> Vec<DriverProfile>;

    /// Drivers closest to `pickup`, nearest first.
    fn nearby(&self, pickup: GeoPoint, limit: usize, estimates: &EstimateConfig) -> Vec<NearbyDriver> {
        let mut offers: Vec<NearbyDriver> = self
            .all()
            .into_iter()
            .map(|profile| {
                let distance_km = profile.location.distance_km(pickup);
                let eta_mins = ceil_minutes(travel_time_secs(distance_km, estimates.average_speed_kmh));
                NearbyDriver {
                    profile,
                    distance_km,
                    eta_mins,
                }
            })
            .collect();
        offers.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        offers.truncate(limit);
        offers
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDriverDirectory {
    drivers: Vec<DriverProfile>,
}

impl InMemoryDriverDirectory {
    pub fn new(drivers: Vec<DriverProfile>) -> Self {
        Self { drivers }
    }

    /// The three-driver demo fleet around lower Manhattan.
    pub fn demo_fleet() -> Self {
        Self::new(vec![
            DriverProfile {
                id: "1".to_string(),
                name: "Carlos Rodriguez".to_string(),
                rating: 4.9,
                phone: "+1 (555) 123-4567".to_string(),
                vehicle_model: "Honda CB 150".to_string(),
                license_plate: "ABC-123".to_string(),
                location: GeoPoint::new(40.713, -74.0055),
            },
            DriverProfile {
                id: "2".to_string(),
                name: "Maria Santos".to_string(),
                rating: 4.8,
                phone: "+1 (555) 987-6543".to_string(),
                vehicle_model: "Yamaha YBR 125".to_string(),
                license_plate: "XYZ-789".to_string(),
                location: GeoPoint::new(40.7125, -74.0065),
            },
            DriverProfile {
                id: "3".to_string(),
                name: "Juan Perez".to_string(),
                rating: 4.7,
                phone: "+1 (555) 456-7890".to_string(),
                vehicle_model: "Suzuki GN 125".to_string(),
                license_plate: "DEF-456".to_string(),
                location: GeoPoint::new(40.7135, -74.0045),
            },
        ])
    }

    pub fn insert(&mut self, driver: DriverProfile) {
        self.drivers.retain(|d| d.id != driver.id);
        self.drivers.push(driver);
    }
}

impl DriverDirectory for InMemoryDriverDirectory {
    fn get(&self, driver_id: &str) -> Option<DriverProfile> {
        self.drivers.iter().find(|d| d.id == driver_id).cloned()
    }

    fn all(&self) -> Vec<DriverProfile> {
        self.drivers.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub pickup: Place,
    pub destination: Place,
    pub driver_id: String,
}

impl BookingRequest {
    pub fn new(pickup: Place, destination: Place, driver_id: impl Into<String>) -> Self {
        Self {
            pickup,
            destination,
            driver_id: driver_id.into(),
        }
    }

    /// Swaps pickup and destination, as the swap button on the booking form does.
    pub fn swapped(self) -> Self {
        Self {
            pickup: self.destination,
            destination: self.pickup,
            driver_id: self.driver_id,
        }
    }

    /// Validates the request and produces a session in `Requested`.
    pub fn confirm(
        self,
        id: RideId,
        directory: &dyn DriverDirectory,
    ) -> Result<RideSession, BookingError> {
        if self.pickup.address.trim().is_empty() || self.destination.address.trim().is_empty() {
            return Err(BookingError::EmptyAddress);
        }
        if self.pickup.location == self.destination.location {
            return Err(BookingError::SamePickupAndDestination);
        }
        let driver = directory
            .get(&self.driver_id)
            .ok_or_else(|| BookingError::UnknownDriver(self.driver_id.clone()))?;

        tracing::info!(ride = %id, driver = %driver.name, "booking confirmed");
        Ok(RideSession::new(id, driver, self.pickup, self.destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::RideStatus;

    fn downtown() -> Place {
        Place::new("Downtown Plaza, Main St", 40.712, -74.005)
    }

    fn mall() -> Place {
        Place::new("Central Mall, Oak Avenue", 40.714, -74.007)
    }

    #[test]
    fn nearby_orders_by_distance_and_limits() {
        let directory = InMemoryDriverDirectory::demo_fleet();
        let offers = directory.nearby(downtown().location, 2, &EstimateConfig::default());
        assert_eq!(offers.len(), 2);
        assert!(offers[0].distance_km <= offers[1].distance_km);
        assert!(offers.iter().all(|o| o.eta_mins >= 1));
    }

    #[test]
    fn confirm_builds_requested_session() {
        let directory = InMemoryDriverDirectory::demo_fleet();
        let session = BookingRequest::new(downtown(), mall(), "1")
            .confirm(RideId::new("ride-1"), &directory)
            .expect("session");
        assert_eq!(session.status, RideStatus::Requested);
        assert_eq!(session.driver.name, "Carlos Rodriguez");
        assert_eq!(session.driver_position.point, session.driver.location);
        assert_eq!(session.start_time, None);
    }

    #[test]
    fn confirm_rejects_bad_requests() {
        let directory = InMemoryDriverDirectory::demo_fleet();
        let err = BookingRequest::new(downtown(), mall(), "99")
            .confirm(RideId::new("ride-1"), &directory)
            .unwrap_err();
        assert_eq!(err, BookingError::UnknownDriver("99".to_string()));

        let err = BookingRequest::new(downtown(), downtown(), "1")
            .confirm(RideId::new("ride-1"), &directory)
            .unwrap_err();
        assert_eq!(err, BookingError::SamePickupAndDestination);

        let err = BookingRequest::new(Place::new("  ", 1.0, 1.0), mall(), "1")
            .confirm(RideId::new("ride-1"), &directory)
            .unwrap_err();
        assert_eq!(err, BookingError::EmptyAddress);
    }

    #[test]
    fn swap_exchanges_endpoints() {
        let request = BookingRequest::new(downtown(), mall(), "2").swapped();
        assert_eq!(request.pickup, mall());
        assert_eq!(request.destination, downtown());
    }

    #[test]
    fn insert_replaces_existing_driver() {
        let mut directory = InMemoryDriverDirectory::demo_fleet();
        let mut carlos = directory.get("1").expect("driver");
        carlos.rating = 5.0;
        directory.insert(carlos);
        assert_eq!(directory.all().len(), 3);
        assert_eq!(directory.get("1").map(|d| d.rating), Some(5.0));
    }
}

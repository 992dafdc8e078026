//! Coordinates and places used by ride sessions.

use h3o::LatLng;
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn to_lat_lng(self) -> Option<LatLng> {
        LatLng::new(self.lat, self.lng).ok()
    }

    /// Great-circle distance in kilometres. Non-finite coordinates yield 0.
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        match (self.to_lat_lng(), other.to_lat_lng()) {
            (Some(a), Some(b)) => a.distance_km(b),
            _ => 0.0,
        }
    }

    /// Shifts the point by the given deltas, clamping latitude to the valid range.
    pub fn offset(self, delta_lat: f64, delta_lng: f64) -> Self {
        let lat = (self.lat + delta_lat).clamp(-90.0, 90.0);
        let mut lng = self.lng + delta_lng;
        if lng > 180.0 {
            lng -= 360.0;
        } else if lng < -180.0 {
            lng += 360.0;
        }
        Self { lat, lng }
    }
}

impl From<LatLng> for GeoPoint {
    fn from(value: LatLng) -> Self {
        Self {
            lat: value.lat(),
            lng: value.lng(),
        }
    }
}

/// A named location: what the rider typed plus where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub address: String,
    pub location: GeoPoint,
}

impl Place {
    pub fn new(address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            address: address.into(),
            location: GeoPoint::new(lat, lng),
        }
    }
}

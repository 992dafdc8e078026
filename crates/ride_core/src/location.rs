//! Pluggable driver location feeds.
//!
//! The tracker stores the feed as a `Box<dyn LocationSource>` ECS resource.
//! [`SimulatedLocationFeed`] jitters the marker around its current position;
//! a real deployment would replace it with a feed backed by device telemetry.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TelemetryConfig;
use crate::ecs::DriverPosition;
use crate::error::RideError;

/// Trait for driver telemetry backends.
pub trait LocationSource: Send + Sync {
    /// Next driver position for a moving ride. `Ok(None)` means the driver did
    /// not report a new position this tick.
    fn next_position(
        &mut self,
        current: DriverPosition,
        config: &TelemetryConfig,
    ) -> Result<Option<DriverPosition>, RideError>;
}

/// ECS resource wrapping a boxed location source.
#[derive(Resource)]
pub struct LocationFeed(pub Box<dyn LocationSource>);

impl LocationFeed {
    pub fn simulated(seed: Option<u64>) -> Self {
        Self(Box::new(SimulatedLocationFeed::new(seed)))
    }
}

pub struct SimulatedLocationFeed {
    rng: StdRng,
}

impl SimulatedLocationFeed {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl LocationSource for SimulatedLocationFeed {
    fn next_position(
        &mut self,
        current: DriverPosition,
        config: &TelemetryConfig,
    ) -> Result<Option<DriverPosition>, RideError> {
        if !self.rng.gen_bool(config.jitter_probability.clamp(0.0, 1.0)) {
            return Ok(None);
        }
        let bound = config.max_offset_deg.abs();
        let (delta_lat, delta_lng) = if bound > 0.0 {
            (
                self.rng.gen_range(-bound..=bound),
                self.rng.gen_range(-bound..=bound),
            )
        } else {
            (0.0, 0.0)
        };
        Ok(Some(DriverPosition {
            point: current.point.offset(delta_lat, delta_lng),
            heading_deg: self.rng.gen_range(0.0..360.0),
        }))
    }
}

/// A feed that always fails, e.g. when the device has no geolocation support.
pub struct UnavailableLocationFeed {
    pub reason: String,
}

impl LocationSource for UnavailableLocationFeed {
    fn next_position(
        &mut self,
        _current: DriverPosition,
        _config: &TelemetryConfig,
    ) -> Result<Option<DriverPosition>, RideError> {
        Err(RideError::LocationUnavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    #[test]
    fn simulated_feed_stays_within_bounds() {
        let mut feed = SimulatedLocationFeed::new(Some(7));
        let config = TelemetryConfig {
            jitter_probability: 1.0,
            max_offset_deg: 0.0005,
        };
        let start = DriverPosition::at(GeoPoint::new(40.7128, -74.006));
        for _ in 0..200 {
            let next = feed
                .next_position(start, &config)
                .expect("feed")
                .expect("position");
            assert!((next.point.lat - start.point.lat).abs() <= 0.0005 + 1e-12);
            assert!((next.point.lng - start.point.lng).abs() <= 0.0005 + 1e-12);
            assert!((0.0..360.0).contains(&next.heading_deg));
        }
    }

    #[test]
    fn zero_probability_never_moves() {
        let mut feed = SimulatedLocationFeed::new(Some(7));
        let config = TelemetryConfig {
            jitter_probability: 0.0,
            max_offset_deg: 0.0005,
        };
        let start = DriverPosition::at(GeoPoint::new(40.7128, -74.006));
        for _ in 0..50 {
            assert_eq!(feed.next_position(start, &config), Ok(None));
        }
    }

    #[test]
    fn unavailable_feed_reports_reason() {
        let mut feed = UnavailableLocationFeed {
            reason: "permission denied".to_string(),
        };
        let start = DriverPosition::at(GeoPoint::new(0.0, 0.0));
        assert_eq!(
            feed.next_position(start, &TelemetryConfig::default()),
            Err(RideError::LocationUnavailable("permission denied".to_string()))
        );
    }
}

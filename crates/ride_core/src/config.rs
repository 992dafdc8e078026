//! Tracker configuration.
//!
//! Every knob of the simulated progression lives here rather than in the
//! systems: tick interval, per-edge advance probabilities, telemetry jitter,
//! pricing and ETA speed. Each section is inserted into the ECS world as its
//! own resource by [`TrackerConfig::insert_into`].

use std::path::Path;

use bevy_ecs::prelude::{Resource, World};
use serde::{Deserialize, Serialize};

use crate::clock::ONE_SEC_MS;
use crate::error::ConfigError;
use crate::estimates::{EstimateConfig, MIN_SPEED_KMH};
use crate::pricing::PricingConfig;
use crate::status::RideStatus;

/// Default progression tick interval: 2 seconds (simulation ms).
const DEFAULT_TICK_INTERVAL_MS: u64 = 2 * ONE_SEC_MS;

/// Per-edge probability that a tick advances the ride along the happy path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeProbabilities {
    pub requested_to_accepted: f64,
    pub accepted_to_arriving: f64,
    pub arriving_to_at_pickup: f64,
    pub at_pickup_to_in_progress: f64,
    pub in_progress_to_completed: f64,
}

impl Default for EdgeProbabilities {
    fn default() -> Self {
        Self {
            requested_to_accepted: 0.5,
            accepted_to_arriving: 0.4,
            arriving_to_at_pickup: 0.2,
            at_pickup_to_in_progress: 0.1,
            in_progress_to_completed: 0.05,
        }
    }
}

impl EdgeProbabilities {
    /// Same probability on every edge; handy for deterministic tests (`1.0`).
    pub fn uniform(p: f64) -> Self {
        Self {
            requested_to_accepted: p,
            accepted_to_arriving: p,
            arriving_to_at_pickup: p,
            at_pickup_to_in_progress: p,
            in_progress_to_completed: p,
        }
    }

    /// Probability of leaving `status` on a tick. Terminal statuses never advance.
    pub fn for_status(&self, status: RideStatus) -> f64 {
        match status {
            RideStatus::Requested => self.requested_to_accepted,
            RideStatus::Accepted => self.accepted_to_arriving,
            RideStatus::ArrivingAtPickup => self.arriving_to_at_pickup,
            RideStatus::AtPickup => self.at_pickup_to_in_progress,
            RideStatus::InProgress => self.in_progress_to_completed,
            RideStatus::Completed | RideStatus::Cancelled => 0.0,
        }
    }

    fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("requested_to_accepted", self.requested_to_accepted),
            ("accepted_to_arriving", self.accepted_to_arriving),
            ("arriving_to_at_pickup", self.arriving_to_at_pickup),
            ("at_pickup_to_in_progress", self.at_pickup_to_in_progress),
            ("in_progress_to_completed", self.in_progress_to_completed),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct ProgressionConfig {
    pub tick_interval_ms: u64,
    pub edges: EdgeProbabilities,
    /// Seed for RNG (for reproducibility). `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            edges: EdgeProbabilities::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Probability that a tick moves the driver marker.
    pub jitter_probability: f64,
    /// Largest offset applied per axis, in degrees.
    pub max_offset_deg: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            jitter_probability: 0.3,
            max_offset_deg: 0.0005,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub progression: ProgressionConfig,
    pub telemetry: TelemetryConfig,
    pub pricing: PricingConfig,
    pub estimates: EstimateConfig,
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            message: format!("{value} is not a probability in [0, 1]"),
        })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            message: format!("{value} must be a non-negative number"),
        })
    }
}

impl TrackerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.progression.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.progression.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "progression.tick_interval_ms",
                message: "must be positive".to_string(),
            });
        }
        for (field, value) in self.progression.edges.entries() {
            check_probability(field, value)?;
        }
        check_probability("telemetry.jitter_probability", self.telemetry.jitter_probability)?;
        check_non_negative("telemetry.max_offset_deg", self.telemetry.max_offset_deg)?;
        check_non_negative("pricing.base_fare", self.pricing.base_fare)?;
        check_non_negative("pricing.per_km_rate", self.pricing.per_km_rate)?;
        check_non_negative("pricing.service_fee", self.pricing.service_fee)?;
        let speed = self.estimates.average_speed_kmh;
        if !(speed.is_finite() && speed >= MIN_SPEED_KMH) {
            return Err(ConfigError::Invalid {
                field: "estimates.average_speed_kmh",
                message: format!("{speed} is below {MIN_SPEED_KMH} km/h"),
            });
        }
        Ok(())
    }

    pub fn insert_into(&self, world: &mut World) {
        world.insert_resource(self.progression);
        world.insert_resource(self.telemetry);
        world.insert_resource(self.pricing);
        world.insert_resource(self.estimates);
    }
}

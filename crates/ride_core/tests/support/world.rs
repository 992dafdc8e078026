#![allow(dead_code)]

use bevy_ecs::prelude::World;
use ride_core::config::{EdgeProbabilities, ProgressionConfig, TelemetryConfig, TrackerConfig};
use ride_core::location::{LocationFeed, LocationSource};
use ride_core::tracker::{init_world, RideTracker};

/// Builder configuration for reproducible test worlds.
#[derive(Clone, Debug)]
pub struct TestWorldConfig {
    pub seed: u64,
    pub tick_interval_ms: u64,
    pub edges: EdgeProbabilities,
    pub telemetry: TelemetryConfig,
}

impl Default for TestWorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_interval_ms: 2_000,
            edges: EdgeProbabilities::uniform(1.0),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Helper that populates the ECS world (or a whole tracker) for integration tests.
#[derive(Default)]
pub struct TestWorldBuilder {
    config: TestWorldConfig,
    location_source: Option<Box<dyn LocationSource>>,
}

impl TestWorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval_ms: u64) -> Self {
        self.config.tick_interval_ms = tick_interval_ms;
        self
    }

    /// Same advance probability on every edge.
    pub fn with_uniform_edges(mut self, p: f64) -> Self {
        self.config.edges = EdgeProbabilities::uniform(p);
        self
    }

    pub fn with_edges(mut self, edges: EdgeProbabilities) -> Self {
        self.config.edges = edges;
        self
    }

    pub fn with_telemetry(mut self, telemetry: TelemetryConfig) -> Self {
        self.config.telemetry = telemetry;
        self
    }

    /// Replace the simulated location feed.
    pub fn with_location_source(mut self, source: Box<dyn LocationSource>) -> Self {
        self.location_source = Some(source);
        self
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            progression: ProgressionConfig {
                tick_interval_ms: self.config.tick_interval_ms,
                edges: self.config.edges,
                seed: Some(self.config.seed),
            },
            telemetry: self.config.telemetry,
            ..Default::default()
        }
    }

    /// Build the ECS world with the configured resources.
    pub fn build(self) -> World {
        let mut world = World::new();
        init_world(&mut world, &self.tracker_config());
        if let Some(source) = self.location_source {
            world.insert_resource(LocationFeed(source));
        }
        world
    }

    /// Build a tracker with the configured resources.
    pub fn build_tracker(self) -> RideTracker {
        let config = self.tracker_config();
        let tracker = RideTracker::new(config).expect("valid test config");
        match self.location_source {
            Some(source) => tracker.with_location_source(source),
            None => tracker,
        }
    }
}

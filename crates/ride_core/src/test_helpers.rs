//! Test helpers for common test setup and utilities.
//!
//! Shared by unit tests and the integration tests under `tests/`.

use bevy_ecs::prelude::{Entity, World};

use crate::booking::{DriverDirectory, InMemoryDriverDirectory};
use crate::config::{EdgeProbabilities, ProgressionConfig, TrackerConfig};
use crate::ecs::{DriverPosition, Estimates, Ride, RideTiming, Status};
use crate::geo::Place;
use crate::session::{RideId, RideSession};
use crate::status::RideStatus;
use crate::systems::transition::{refresh_estimates, TransitionContext};
use crate::tracker::{init_world, spawn_ride};

/// Seed used by every helper that builds RNG-backed resources.
pub const TEST_SEED: u64 = 42;

pub fn downtown_plaza() -> Place {
    Place::new("Downtown Plaza, Main St", 40.712, -74.005)
}

pub fn central_mall() -> Place {
    Place::new("Central Mall, Oak Avenue", 40.714, -74.007)
}

/// A `Requested` ride with the first demo driver, id `ride-1`.
///
/// # Panics
///
/// Panics if the demo fleet loses its first driver.
pub fn demo_session() -> RideSession {
    let driver = InMemoryDriverDirectory::demo_fleet()
        .all()
        .into_iter()
        .next()
        .expect("demo fleet has drivers");
    RideSession::new(RideId::new("ride-1"), driver, downtown_plaza(), central_mall())
}

/// Seeded config with the given edge probabilities.
pub fn test_config(edges: EdgeProbabilities) -> TrackerConfig {
    TrackerConfig {
        progression: ProgressionConfig {
            edges,
            ..Default::default()
        },
        ..Default::default()
    }
    .with_seed(TEST_SEED)
}

/// Create a world with every resource the tracking systems read.
pub fn create_test_world(edges: EdgeProbabilities) -> World {
    let mut world = World::new();
    init_world(&mut world, &test_config(edges));
    world
}

/// Spawns `session` and schedules its first tick one interval from now.
pub fn spawn_tracked(world: &mut World, session: RideSession) -> Entity {
    spawn_ride(world, session)
}

/// Builds the components of a ride at `status` without a world.
pub fn spawn_parts(
    session: RideSession,
    status: RideStatus,
    ctx: &TransitionContext,
) -> (Ride, Status, RideTiming, Estimates, DriverPosition) {
    let position = session.driver_position;
    let ride = Ride {
        id: session.id,
        driver: session.driver,
        pickup: session.pickup,
        destination: session.destination,
    };
    let estimates = refresh_estimates(status, &ride, &position, ctx);
    let timing = RideTiming {
        requested_at: ctx.now,
        start_time: session.start_time,
        last_updated_at: ctx.now,
        ..Default::default()
    };
    (ride, Status(status), timing, estimates, position)
}

#![allow(dead_code)]

use bevy_ecs::prelude::{Entity, World};
use ride_core::booking::{BookingRequest, InMemoryDriverDirectory};
use ride_core::ecs::Status;
use ride_core::session::{RideId, RideSession};
use ride_core::status::RideStatus;
use ride_core::test_helpers::{central_mall, demo_session, downtown_plaza, spawn_tracked};

/// Session booked through the demo fleet, the way the booking screen does it.
pub fn booked_session(id: &str, driver_id: &str) -> RideSession {
    BookingRequest::new(downtown_plaza(), central_mall(), driver_id)
        .confirm(RideId::new(id), &InMemoryDriverDirectory::demo_fleet())
        .expect("demo booking")
}

/// Demo session already at `status`.
pub fn session_at(status: RideStatus) -> RideSession {
    let mut session = demo_session();
    session.status = status;
    session
}

/// Spawns a tracked ride and forces its status.
pub fn spawn_ride_at(world: &mut World, status: RideStatus) -> Entity {
    let entity = spawn_tracked(world, demo_session());
    world.entity_mut(entity).insert(Status(status));
    entity
}

pub fn status_of(world: &World, entity: Entity) -> Option<RideStatus> {
    world.get::<Status>(entity).map(|s| s.0)
}

//! Ride tracker: the action surface the UI layer talks to.
//!
//! Owns the ECS world, the tracking schedule and the registered observers.
//! Time only moves when the caller asks ([`RideTracker::advance_by`]), so a
//! host event loop decides how simulation milliseconds map to wall time.
//! User actions are applied synchronously and drop the ride's pending ticks,
//! so they always win over the next scheduled tick.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Schedule, World};

use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::config::{ProgressionConfig, TrackerConfig};
use crate::ecs::{DriverPosition, Estimates, LocationBanner, Ride, RideTiming, Status, Tracking};
use crate::error::{ConfigError, RideError};
use crate::estimates::EstimateConfig;
use crate::location::{LocationFeed, LocationSource};
use crate::observer::{RideObserver, RideOutbox};
use crate::presentation::{display_binding, DisplayBinding, RideView};
use crate::pricing::PricingConfig;
use crate::runner::{run_next_event, run_until_with, tracking_schedule};
use crate::session::{RideId, RideSession};
use crate::status::RideStatus;
use crate::systems::progress_tick::ProgressionRng;
use crate::systems::transition::{apply_transition, refresh_estimates, RideRow, TransitionContext};
use crate::telemetry::{RideTelemetry, TransitionCause};

/// Result of a user action that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied(RideStatus),
    /// The ride was already terminal; nothing changed.
    Unchanged(RideStatus),
}

impl ActionOutcome {
    pub fn status(self) -> RideStatus {
        match self {
            ActionOutcome::Applied(status) | ActionOutcome::Unchanged(status) => status,
        }
    }
}

/// Inserts every resource the tracking schedule reads.
pub fn init_world(world: &mut World, config: &TrackerConfig) {
    world.insert_resource(SimulationClock::default());
    world.insert_resource(RideTelemetry::default());
    world.insert_resource(RideOutbox::default());
    world.insert_resource(ProgressionRng::new(config.progression.seed));
    world.insert_resource(LocationFeed::simulated(
        config.progression.seed.map(|seed| seed.wrapping_add(0x5A5A_5A5A)),
    ));
    config.insert_into(world);
}

fn transition_context(world: &World) -> TransitionContext {
    TransitionContext {
        now: world.resource::<SimulationClock>().now(),
        pricing: world.get_resource::<PricingConfig>().copied().unwrap_or_default(),
        estimates: world.get_resource::<EstimateConfig>().copied().unwrap_or_default(),
    }
}

/// Spawns the session's components and, unless it is already terminal,
/// schedules its first progression tick.
pub fn spawn_ride(world: &mut World, session: RideSession) -> Entity {
    let ctx = transition_context(world);
    let ride = Ride {
        id: session.id,
        driver: session.driver,
        pickup: session.pickup,
        destination: session.destination,
    };
    let estimates = refresh_estimates(session.status, &ride, &session.driver_position, &ctx);
    let timing = RideTiming {
        requested_at: ctx.now,
        start_time: session.start_time,
        last_updated_at: ctx.now,
        ..Default::default()
    };
    let status = session.status;
    let entity = world
        .spawn((ride, Status(status), session.driver_position, timing, estimates))
        .id();

    if !status.is_terminal() {
        resume_tracking(world, entity);
    }
    entity
}

fn resume_tracking(world: &mut World, entity: Entity) {
    let interval = world
        .get_resource::<ProgressionConfig>()
        .copied()
        .unwrap_or_default()
        .tick_interval_ms;
    world.entity_mut(entity).insert(Tracking);
    world.resource_mut::<SimulationClock>().schedule_in(
        interval,
        EventKind::ProgressTick,
        Some(EventSubject::Ride(entity)),
    );
}

fn halt_tracking(world: &mut World, entity: Entity) -> bool {
    let was_tracking = world.get::<Tracking>(entity).is_some();
    if let Some(mut entity_mut) = world.get_entity_mut(entity) {
        entity_mut.remove::<Tracking>();
    }
    world
        .resource_mut::<SimulationClock>()
        .cancel_subject(EventSubject::Ride(entity));
    was_tracking
}

/// Reads a ride's components back into a [`RideSession`].
pub fn session_of(world: &World, entity: Entity) -> Option<RideSession> {
    let ride = world.get::<Ride>(entity)?;
    let status = world.get::<Status>(entity)?;
    let position = world.get::<DriverPosition>(entity)?;
    let timing = world.get::<RideTiming>(entity)?;
    let estimates = world.get::<Estimates>(entity)?;
    Some(RideSession {
        id: ride.id.clone(),
        status: status.0,
        driver: ride.driver.clone(),
        driver_position: *position,
        pickup: ride.pickup.clone(),
        destination: ride.destination.clone(),
        estimates: Some(estimates.0),
        start_time: timing.start_time,
    })
}

pub fn view_of(world: &World, entity: Entity) -> Option<RideView> {
    let session = session_of(world, entity)?;
    let banner = world.get::<LocationBanner>(entity).map(|b| b.0.clone());
    let last_updated_at = world.get::<RideTiming>(entity)?.last_updated_at;
    Some(RideView::compose(session, banner, last_updated_at))
}

pub struct RideTracker {
    world: World,
    schedule: Schedule,
    rides: HashMap<RideId, Entity>,
    observers: Vec<Box<dyn RideObserver>>,
}

impl RideTracker {
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = World::new();
        init_world(&mut world, &config);
        Ok(Self {
            world,
            schedule: tracking_schedule(),
            rides: HashMap::new(),
            observers: Vec::new(),
        })
    }

    /// Replaces the simulated location feed.
    pub fn with_location_source(mut self, source: Box<dyn LocationSource>) -> Self {
        self.world.insert_resource(LocationFeed(source));
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn RideObserver>) {
        self.observers.push(observer);
    }

    pub fn now(&self) -> u64 {
        self.world.resource::<SimulationClock>().now()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn telemetry(&self) -> &RideTelemetry {
        self.world.resource::<RideTelemetry>()
    }

    pub fn ride_ids(&self) -> Vec<RideId> {
        let mut ids: Vec<RideId> = self.rides.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn entity(&self, id: &RideId) -> Result<Entity, RideError> {
        self.rides
            .get(id)
            .copied()
            .ok_or_else(|| RideError::UnknownRide(id.to_string()))
    }

    /// Starts tracking `session`. Starting a ride the tracker already holds
    /// resumes its progression if it was stopped and is not terminal.
    pub fn start(&mut self, session: RideSession) -> Result<RideView, RideError> {
        let entity = match self.rides.get(&session.id).copied() {
            Some(entity) => {
                let status = self.world.get::<Status>(entity).map(|s| s.0);
                let tracked = self.world.get::<Tracking>(entity).is_some();
                if let Some(status) = status.filter(|s| !s.is_terminal() && !tracked) {
                    tracing::info!(ride = %session.id, %status, "resuming ride tracking");
                    resume_tracking(&mut self.world, entity);
                }
                entity
            }
            None => {
                let id = session.id.clone();
                tracing::info!(ride = %id, status = %session.status, "starting ride tracking");
                let entity = spawn_ride(&mut self.world, session);
                self.rides.insert(id, entity);
                entity
            }
        };
        self.world.resource_mut::<RideOutbox>().mark_updated(entity);
        self.flush();
        view_of(&self.world, entity).ok_or_else(|| RideError::UnknownRide(format!("{entity:?}")))
    }

    /// Halts progression for `id`, keeping its last state. Returns whether it was running.
    pub fn stop(&mut self, id: &RideId) -> Result<bool, RideError> {
        let entity = self.entity(id)?;
        let was_tracking = halt_tracking(&mut self.world, entity);
        if was_tracking {
            tracing::info!(ride = %id, "ride tracking stopped");
        }
        Ok(was_tracking)
    }

    /// Stops and forgets the ride, returning its final state. The ride's
    /// transition records go with it.
    pub fn discard(&mut self, id: &RideId) -> Option<RideSession> {
        let entity = self.rides.remove(id)?;
        halt_tracking(&mut self.world, entity);
        let session = session_of(&self.world, entity);
        self.world.despawn(entity);
        self.world.resource_mut::<RideTelemetry>().forget(id);
        tracing::debug!(ride = %id, "ride discarded");
        session
    }

    /// Cancels the ride. Cancelling a terminal ride is a no-op.
    pub fn cancel(&mut self, id: &RideId) -> Result<ActionOutcome, RideError> {
        self.apply_action(id, RideStatus::Cancelled, TransitionCause::Cancel)
    }

    /// Marks an in-progress ride as completed. A terminal ride is left as is;
    /// any other status is an invalid transition.
    pub fn complete(&mut self, id: &RideId) -> Result<ActionOutcome, RideError> {
        self.apply_action(id, RideStatus::Completed, TransitionCause::Complete)
    }

    fn apply_action(
        &mut self,
        id: &RideId,
        target: RideStatus,
        cause: TransitionCause,
    ) -> Result<ActionOutcome, RideError> {
        let entity = self.entity(id)?;
        let ctx = transition_context(&self.world);

        let mut query = self
            .world
            .query::<(&Ride, &mut Status, &mut RideTiming, &mut Estimates, &DriverPosition)>();
        let result = {
            let Ok((ride, mut status, mut timing, mut estimates, position)) =
                query.get_mut(&mut self.world, entity)
            else {
                return Err(RideError::UnknownRide(id.to_string()));
            };
            if status.0.is_terminal() {
                tracing::debug!(ride = %id, status = %status.0, ?cause, "action on terminal ride ignored");
                return Ok(ActionOutcome::Unchanged(status.0));
            }
            apply_transition(
                RideRow {
                    entity,
                    ride,
                    status: &mut status,
                    timing: &mut timing,
                    estimates: &mut estimates,
                    position,
                },
                target,
                cause,
                &ctx,
            )
        };

        match result {
            Ok(record) => {
                let to = record.to;
                self.world.resource_mut::<RideTelemetry>().transitions.push(record);
                if to.is_terminal() {
                    halt_tracking(&mut self.world, entity);
                    self.world.entity_mut(entity).remove::<LocationBanner>();
                }
                self.world.resource_mut::<RideOutbox>().mark_updated(entity);
                self.flush();
                Ok(ActionOutcome::Applied(to))
            }
            Err(err) => {
                tracing::warn!(ride = %id, %err, ?cause, "action rejected");
                let mut telemetry = self.world.resource_mut::<RideTelemetry>();
                telemetry.rejected_transitions = telemetry.rejected_transitions.saturating_add(1);
                Err(err)
            }
        }
    }

    /// Processes the next pending event. Returns its timestamp.
    pub fn step(&mut self) -> Option<u64> {
        let event = run_next_event(&mut self.world, &mut self.schedule)?;
        self.flush();
        Some(event.timestamp)
    }

    /// Moves simulation time forward by `ms`, processing every tick due.
    pub fn advance_by(&mut self, ms: u64) -> usize {
        let until = self.now().saturating_add(ms);
        self.advance_until(until)
    }

    /// Processes every event due at or before `until_ms`, notifying observers
    /// after each one, then moves the clock to `until_ms`.
    pub fn advance_until(&mut self, until_ms: u64) -> usize {
        let observers = &mut self.observers;
        run_until_with(&mut self.world, &mut self.schedule, until_ms, |world, _| {
            deliver(world, observers);
        })
    }

    pub fn view(&self, id: &RideId) -> Option<RideView> {
        view_of(&self.world, *self.rides.get(id)?)
    }

    pub fn session(&self, id: &RideId) -> Option<RideSession> {
        session_of(&self.world, *self.rides.get(id)?)
    }

    pub fn status(&self, id: &RideId) -> Option<RideStatus> {
        self.world.get::<Status>(*self.rides.get(id)?).map(|s| s.0)
    }

    pub fn binding(&self, id: &RideId) -> Option<DisplayBinding> {
        self.status(id).map(display_binding)
    }

    pub fn is_tracking(&self, id: &RideId) -> bool {
        self.rides
            .get(id)
            .is_some_and(|entity| self.world.get::<Tracking>(*entity).is_some())
    }

    /// Starts tracking and returns a guard that discards the ride when dropped.
    pub fn track(&mut self, session: RideSession) -> Result<TrackingGuard<'_>, RideError> {
        let id = session.id.clone();
        self.start(session)?;
        Ok(TrackingGuard { tracker: self, id })
    }

    fn flush(&mut self) {
        deliver(&mut self.world, &mut self.observers);
    }
}

/// Drains the outbox and delivers its notifications to `observers`.
fn deliver(world: &mut World, observers: &mut [Box<dyn RideObserver>]) {
    let outbox = std::mem::take(&mut *world.resource_mut::<RideOutbox>());
    if observers.is_empty() {
        return;
    }
    for entity in outbox.updated {
        if let Some(view) = view_of(world, entity) {
            for observer in observers.iter_mut() {
                observer.on_update(&view);
            }
        }
    }
    for (_, error) in outbox.errors {
        for observer in observers.iter_mut() {
            observer.on_error(&error);
        }
    }
}

/// Scoped tracking of one ride. Dropping the guard stops progression and
/// discards the ride, on every exit path.
pub struct TrackingGuard<'a> {
    tracker: &'a mut RideTracker,
    id: RideId,
}

impl TrackingGuard<'_> {
    pub fn id(&self) -> &RideId {
        &self.id
    }

    pub fn view(&self) -> Option<RideView> {
        self.tracker.view(&self.id)
    }

    pub fn status(&self) -> Option<RideStatus> {
        self.tracker.status(&self.id)
    }

    pub fn cancel(&mut self) -> Result<ActionOutcome, RideError> {
        self.tracker.cancel(&self.id)
    }

    pub fn complete(&mut self) -> Result<ActionOutcome, RideError> {
        self.tracker.complete(&self.id)
    }

    pub fn stop(&mut self) -> Result<bool, RideError> {
        self.tracker.stop(&self.id)
    }

    pub fn advance_by(&mut self, ms: u64) -> usize {
        self.tracker.advance_by(ms)
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_tracking(&self.id)
    }
}

impl Drop for TrackingGuard<'_> {
    fn drop(&mut self) {
        self.tracker.discard(&self.id);
    }
}

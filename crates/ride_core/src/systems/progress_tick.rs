use bevy_ecs::prelude::{Commands, Query, Res, ResMut, Resource, With};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::ProgressionConfig;
use crate::ecs::{DriverPosition, Estimates, Ride, RideTiming, Status, Tracking};
use crate::estimates::EstimateConfig;
use crate::observer::RideOutbox;
use crate::pricing::PricingConfig;
use crate::systems::transition::{apply_transition, RideRow, TransitionContext};
use crate::telemetry::{RideTelemetry, TransitionCause};

/// RNG behind the per-edge advance rolls.
#[derive(Resource)]
pub struct ProgressionRng(pub StdRng);

impl ProgressionRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// Rolls the advance probability for the ride's current edge and, on success,
/// moves it one step along the happy path. Reschedules itself until the ride
/// reaches a terminal status or tracking stops.
#[allow(clippy::too_many_arguments)]
pub fn progress_tick_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    config: Option<Res<ProgressionConfig>>,
    pricing: Option<Res<PricingConfig>>,
    estimate_config: Option<Res<EstimateConfig>>,
    mut rng: ResMut<ProgressionRng>,
    mut telemetry: ResMut<RideTelemetry>,
    mut outbox: ResMut<RideOutbox>,
    mut commands: Commands,
    mut rides: Query<
        (&Ride, &mut Status, &mut RideTiming, &mut Estimates, &DriverPosition),
        With<Tracking>,
    >,
) {
    if event.0.kind != EventKind::ProgressTick {
        return;
    }
    let Some(EventSubject::Ride(entity)) = event.0.subject else {
        return;
    };
    // Stopped or discarded rides simply let their last tick fall through.
    let Ok((ride, mut status, mut timing, mut estimates, position)) = rides.get_mut(entity) else {
        return;
    };

    let config = config.as_deref().copied().unwrap_or_default();
    telemetry.ticks_processed = telemetry.ticks_processed.saturating_add(1);

    let current = status.0;
    if !current.is_terminal() {
        let p = config.edges.for_status(current).clamp(0.0, 1.0);
        if let Some(target) = current.next().filter(|_| rng.0.gen_bool(p)) {
            let ctx = TransitionContext {
                now: clock.now(),
                pricing: pricing.as_deref().copied().unwrap_or_default(),
                estimates: estimate_config.as_deref().copied().unwrap_or_default(),
            };
            let row = RideRow {
                entity,
                ride,
                status: &mut status,
                timing: &mut timing,
                estimates: &mut estimates,
                position,
            };
            match apply_transition(row, target, TransitionCause::Tick, &ctx) {
                Ok(record) => {
                    telemetry.transitions.push(record);
                    outbox.mark_updated(entity);
                }
                Err(err) => {
                    tracing::warn!(ride = %ride.id, %err, "tick transition rejected");
                    telemetry.rejected_transitions = telemetry.rejected_transitions.saturating_add(1);
                }
            }
        } else {
            tracing::debug!(ride = %ride.id, status = %current, "tick without progress");
        }
    }

    if status.0.is_terminal() {
        tracing::debug!(ride = %ride.id, status = %status.0, "progression halted");
        commands.entity(entity).remove::<Tracking>();
        return;
    }

    clock.schedule_in(
        config.tick_interval_ms,
        EventKind::ProgressTick,
        Some(EventSubject::Ride(entity)),
    );
}

//! Driver telemetry system: moves the driver marker on each progression tick.
//!
//! Positions come from the [`LocationFeed`] resource. Updates are applied
//! only while the ride is tracked and the driver is moving. A feed failure
//! raises a [`LocationBanner`] and is reported to observers once per outage;
//! tracking carries on without positions. The banner clears on the next good
//! position, or as soon as the driver stops moving.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut, With};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::TelemetryConfig;
use crate::ecs::{DriverPosition, Estimates, LocationBanner, Ride, RideTiming, Status, Tracking};
use crate::estimates::EstimateConfig;
use crate::location::LocationFeed;
use crate::observer::RideOutbox;
use crate::pricing::PricingConfig;
use crate::systems::transition::{refresh_estimates, TransitionContext};
use crate::telemetry::RideTelemetry;

#[allow(clippy::too_many_arguments)]
pub fn driver_telemetry_system(
    event: Res<CurrentEvent>,
    clock: Res<SimulationClock>,
    config: Option<Res<TelemetryConfig>>,
    pricing: Option<Res<PricingConfig>>,
    estimate_config: Option<Res<EstimateConfig>>,
    mut feed: ResMut<LocationFeed>,
    mut telemetry: ResMut<RideTelemetry>,
    mut outbox: ResMut<RideOutbox>,
    mut commands: Commands,
    mut rides: Query<
        (
            Entity,
            &Ride,
            &Status,
            &mut DriverPosition,
            &mut RideTiming,
            &mut Estimates,
            Option<&LocationBanner>,
        ),
        With<Tracking>,
    >,
) {
    if event.0.kind != EventKind::ProgressTick {
        return;
    }
    let Some(EventSubject::Ride(subject)) = event.0.subject else {
        return;
    };
    let Ok((entity, ride, status, mut position, mut timing, mut estimates, banner)) =
        rides.get_mut(subject)
    else {
        return;
    };
    if !status.0.driver_is_moving() {
        if banner.is_some() {
            commands.entity(entity).remove::<LocationBanner>();
            outbox.mark_updated(entity);
        }
        return;
    }

    let config = config.as_deref().copied().unwrap_or_default();
    match feed.0.next_position(*position, &config) {
        Ok(Some(next)) => {
            *position = next;
            let ctx = TransitionContext {
                now: clock.now(),
                pricing: pricing.as_deref().copied().unwrap_or_default(),
                estimates: estimate_config.as_deref().copied().unwrap_or_default(),
            };
            *estimates = refresh_estimates(status.0, ride, &next, &ctx);
            timing.last_updated_at = clock.now();
            telemetry.position_updates = telemetry.position_updates.saturating_add(1);
            if banner.is_some() {
                tracing::info!(ride = %ride.id, "location feed recovered");
                commands.entity(entity).remove::<LocationBanner>();
            }
            outbox.mark_updated(entity);
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(ride = %ride.id, %err, "driver location unavailable");
            telemetry.location_failures = telemetry.location_failures.saturating_add(1);
            if banner.is_none() {
                commands
                    .entity(entity)
                    .insert(LocationBanner(err.to_string()));
                outbox.mark_updated(entity);
                outbox.push_error(entity, err);
            }
        }
    }
}

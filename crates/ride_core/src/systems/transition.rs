//! Shared status-change path used by the tick system and by user actions.
//!
//! Every status change goes through [`apply_transition`], so derived fields
//! (timing, estimates) are updated the same way no matter who asked.

use bevy_ecs::prelude::Entity;

use crate::ecs::{DriverPosition, Estimates, Ride, RideTiming, Status};
use crate::error::RideError;
use crate::estimates::{compute_estimates, EstimateConfig};
use crate::pricing::PricingConfig;
use crate::status::{transition, RideStatus};
use crate::telemetry::{TransitionCause, TransitionRecord};

/// Borrowed view of one ride's mutable state.
pub struct RideRow<'a> {
    pub entity: Entity,
    pub ride: &'a Ride,
    pub status: &'a mut Status,
    pub timing: &'a mut RideTiming,
    pub estimates: &'a mut Estimates,
    pub position: &'a DriverPosition,
}

#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub now: u64,
    pub pricing: PricingConfig,
    pub estimates: EstimateConfig,
}

pub fn refresh_estimates(
    status: RideStatus,
    ride: &Ride,
    position: &DriverPosition,
    ctx: &TransitionContext,
) -> Estimates {
    Estimates(compute_estimates(
        status,
        position.point,
        ride.pickup.location,
        ride.destination.location,
        &ctx.pricing,
        &ctx.estimates,
    ))
}

/// Validates and applies `target`. On error the row is left untouched.
pub fn apply_transition(
    row: RideRow<'_>,
    target: RideStatus,
    cause: TransitionCause,
    ctx: &TransitionContext,
) -> Result<TransitionRecord, RideError> {
    let from = row.status.0;
    if from.is_terminal() {
        return Err(RideError::AlreadyTerminal(from));
    }
    let to = transition(from, target)?;

    row.status.0 = to;
    match to {
        RideStatus::Accepted => {
            row.timing.accepted_at.get_or_insert(ctx.now);
        }
        RideStatus::InProgress => {
            // start_time is written at most once per session.
            row.timing.start_time.get_or_insert(ctx.now);
        }
        RideStatus::Completed => row.timing.completed_at = Some(ctx.now),
        RideStatus::Cancelled => row.timing.cancelled_at = Some(ctx.now),
        RideStatus::Requested | RideStatus::ArrivingAtPickup | RideStatus::AtPickup => {}
    }
    row.timing.last_updated_at = ctx.now;
    *row.estimates = refresh_estimates(to, row.ride, row.position, ctx);

    tracing::info!(ride = %row.ride.id, %from, %to, at = ctx.now, ?cause, "ride status changed");
    Ok(TransitionRecord {
        entity: row.entity,
        ride: row.ride.id.clone(),
        from,
        to,
        at: ctx.now,
        cause,
    })
}

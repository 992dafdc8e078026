//! Telemetry: records status transitions and tracker health counters.

use bevy_ecs::prelude::{Entity, Resource};

use crate::session::RideId;
use crate::status::RideStatus;

/// What caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    Tick,
    Cancel,
    Complete,
}

/// One applied status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRecord {
    pub entity: Entity,
    pub ride: RideId,
    pub from: RideStatus,
    pub to: RideStatus,
    pub at: u64,
    pub cause: TransitionCause,
}

#[derive(Debug, Default, Resource)]
pub struct RideTelemetry {
    pub transitions: Vec<TransitionRecord>,
    pub ticks_processed: u64,
    pub rejected_transitions: u64,
    pub location_failures: u64,
    pub position_updates: u64,
}

impl RideTelemetry {
    pub fn transitions_for<'a>(&'a self, ride: &'a RideId) -> impl Iterator<Item = &'a TransitionRecord> + 'a {
        self.transitions.iter().filter(move |record| &record.ride == ride)
    }

    /// Drops every record of `ride`. Returns how many were removed.
    pub fn forget(&mut self, ride: &RideId) -> usize {
        let before = self.transitions.len();
        self.transitions.retain(|record| &record.ride != ride);
        before - self.transitions.len()
    }

    /// Status path taken by `ride`, starting with the first `from` status.
    pub fn status_path(&self, ride: &RideId) -> Vec<RideStatus> {
        let mut path = Vec::new();
        for record in self.transitions_for(ride) {
            if path.is_empty() {
                path.push(record.from);
            }
            path.push(record.to);
        }
        path
    }
}

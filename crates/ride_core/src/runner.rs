//! Tracker runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::systems::{
    driver_telemetry::driver_telemetry_system, progress_tick::progress_tick_system,
};

fn is_progress_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ProgressTick)
        .unwrap_or(false)
}

/// Runs one step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns the processed event, or `None` if the clock was empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> Option<Event> {
    let event = world.resource_mut::<SimulationClock>().pop_next()?;
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    Some(event)
}

/// Processes every event due at or before `until_ms`, then moves the clock to
/// `until_ms`. Returns the number of events processed.
pub fn run_until(world: &mut World, schedule: &mut Schedule, until_ms: u64) -> usize {
    run_until_with(world, schedule, until_ms, |_, _| {})
}

/// Like [run_until], calling `after_step` once after each processed event.
pub fn run_until_with<F>(
    world: &mut World,
    schedule: &mut Schedule,
    until_ms: u64,
    mut after_step: F,
) -> usize
where
    F: FnMut(&mut World, Event),
{
    let mut steps = 0;
    loop {
        let next_ts = world.resource::<SimulationClock>().next_event_time();
        match next_ts {
            Some(ts) if ts <= until_ms => {
                let Some(event) = run_next_event(world, schedule) else {
                    break;
                };
                after_step(world, event);
                steps += 1;
            }
            _ => break,
        }
    }
    world.resource_mut::<SimulationClock>().advance_to(until_ms);
    steps
}

/// Runs steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule).is_some() {
        steps += 1;
    }
    steps
}

/// Builds the tracking schedule: progression first so telemetry sees the new
/// status, then [apply_deferred] so component changes land before the next step.
pub fn tracking_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            (progress_tick_system, driver_telemetry_system)
                .chain()
                .run_if(is_progress_tick),
            apply_deferred,
        )
            .chain(),
    );
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgeProbabilities;
    use crate::test_helpers::{create_test_world, demo_session, spawn_tracked};

    #[test]
    fn after_step_sees_each_event_in_order() {
        let mut world = create_test_world(EdgeProbabilities::uniform(0.0));
        spawn_tracked(&mut world, demo_session());
        let mut schedule = tracking_schedule();

        let mut seen = Vec::new();
        let steps = run_until_with(&mut world, &mut schedule, 7_000, |world, event| {
            assert_eq!(world.resource::<SimulationClock>().now(), event.timestamp);
            seen.push(event.timestamp);
        });

        assert_eq!(steps, 3);
        assert_eq!(seen, vec![2_000, 4_000, 6_000]);
        assert_eq!(world.resource::<SimulationClock>().now(), 7_000);
    }
}

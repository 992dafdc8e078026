//! Tick throughput benchmarks for ride_core using Criterion.rs.

use bevy_ecs::prelude::World;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ride_core::config::EdgeProbabilities;
use ride_core::runner::{run_until_empty, tracking_schedule};
use ride_core::session::RideId;
use ride_core::status::{transition, RideStatus};
use ride_core::test_helpers::{create_test_world, demo_session, spawn_tracked};

fn populated_world(rides: usize, edges: EdgeProbabilities) -> World {
    let mut world = create_test_world(edges);
    for i in 0..rides {
        let mut session = demo_session();
        session.id = RideId::new(format!("ride-{i}"));
        spawn_tracked(&mut world, session);
    }
    world
}

fn bench_progression_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("progression_run");
    for rides in [1usize, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(rides), &rides, |b, &rides| {
            b.iter(|| {
                let mut world = populated_world(rides, EdgeProbabilities::default());
                let mut schedule = tracking_schedule();
                black_box(run_until_empty(&mut world, &mut schedule, 10_000_000));
            });
        });
    }
    group.finish();
}

fn bench_transition_table(c: &mut Criterion) {
    c.bench_function("transition_all_pairs", |b| {
        b.iter(|| {
            let mut ok = 0usize;
            for from in RideStatus::ALL {
                for to in RideStatus::ALL {
                    if transition(black_box(from), black_box(to)).is_ok() {
                        ok += 1;
                    }
                }
            }
            black_box(ok)
        });
    });
}

criterion_group!(benches, bench_progression_run, bench_transition_table);
criterion_main!(benches);

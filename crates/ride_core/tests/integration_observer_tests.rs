mod support;

use std::cell::RefCell;
use std::rc::Rc;

use ride_core::config::{EdgeProbabilities, TelemetryConfig};
use ride_core::error::RideError;
use ride_core::location::UnavailableLocationFeed;
use ride_core::observer::RecordingObserver;
use ride_core::status::RideStatus;
use support::entities::{booked_session, session_at};
use support::world::TestWorldBuilder;

fn still_driver() -> TelemetryConfig {
    TelemetryConfig {
        jitter_probability: 0.0,
        ..Default::default()
    }
}

#[test]
fn observer_sees_every_status_change() {
    let recorder = Rc::new(RefCell::new(RecordingObserver::default()));
    let mut tracker = TestWorldBuilder::new()
        .with_uniform_edges(1.0)
        .with_telemetry(still_driver())
        .build_tracker();
    tracker.subscribe(Box::new(Rc::clone(&recorder)));

    let session = booked_session("ride-obs", "1");
    tracker.start(session).expect("start");
    tracker.advance_by(10_000);

    let statuses: Vec<RideStatus> = recorder
        .borrow()
        .updates
        .iter()
        .map(|view| view.status())
        .collect();
    assert_eq!(
        statuses,
        vec![
            RideStatus::Requested,
            RideStatus::Accepted,
            RideStatus::ArrivingAtPickup,
            RideStatus::AtPickup,
            RideStatus::InProgress,
            RideStatus::Completed,
        ]
    );
    assert!(recorder.borrow().errors.is_empty());
}

#[test]
fn views_carry_eta_and_start_time() {
    let recorder = Rc::new(RefCell::new(RecordingObserver::default()));
    let mut tracker = TestWorldBuilder::new()
        .with_uniform_edges(1.0)
        .with_telemetry(still_driver())
        .build_tracker();
    tracker.subscribe(Box::new(Rc::clone(&recorder)));
    tracker.start(booked_session("ride-eta", "1")).expect("start");
    tracker.advance_by(8_000);

    let recorder = recorder.borrow();
    let accepted = recorder
        .updates
        .iter()
        .find(|view| view.status() == RideStatus::Accepted)
        .expect("accepted view");
    assert!(accepted.detail.starts_with("Arriving in "));
    assert!(accepted.driver_moving);

    let riding = recorder.updates.last().expect("latest view");
    assert_eq!(riding.status(), RideStatus::InProgress);
    assert_eq!(riding.detail, "Started at 00:00:08");
    assert!(riding.show_route);
}

#[test]
fn cancel_notifies_synchronously() {
    let recorder = Rc::new(RefCell::new(RecordingObserver::default()));
    let mut tracker = TestWorldBuilder::new().with_uniform_edges(0.0).build_tracker();
    tracker.subscribe(Box::new(Rc::clone(&recorder)));
    let session = booked_session("ride-cancel", "3");
    let id = session.id.clone();
    tracker.start(session).expect("start");

    tracker.cancel(&id).expect("cancel");
    let last = recorder.borrow().updates.last().cloned().expect("view");
    assert_eq!(last.status(), RideStatus::Cancelled);
    assert_eq!(last.binding.color_token, "bg-destructive");
}

#[test]
fn location_failure_degrades_without_stopping_progression() {
    let recorder = Rc::new(RefCell::new(RecordingObserver::default()));
    let mut tracker = TestWorldBuilder::new()
        .with_uniform_edges(0.0)
        .with_location_source(Box::new(UnavailableLocationFeed {
            reason: "geolocation not supported".to_string(),
        }))
        .build_tracker();
    tracker.subscribe(Box::new(Rc::clone(&recorder)));

    let session = session_at(RideStatus::Accepted);
    let id = session.id.clone();
    let start_position = session.driver_position;
    tracker.start(session).expect("start");
    tracker.advance_by(6_000);

    let view = tracker.view(&id).expect("view");
    assert_eq!(
        view.location_banner.as_deref(),
        Some("location unavailable: geolocation not supported")
    );
    assert_eq!(view.session.driver_position, start_position);
    assert!(tracker.is_tracking(&id));
    assert_eq!(tracker.telemetry().location_failures, 3);
    assert_eq!(
        recorder.borrow().errors,
        vec![RideError::LocationUnavailable("geolocation not supported".to_string())]
    );
}

#[test]
fn outage_banner_drops_when_driver_reaches_pickup() {
    let edges = EdgeProbabilities {
        accepted_to_arriving: 1.0,
        arriving_to_at_pickup: 1.0,
        ..EdgeProbabilities::uniform(0.0)
    };
    let mut tracker = TestWorldBuilder::new()
        .with_edges(edges)
        .with_location_source(Box::new(UnavailableLocationFeed {
            reason: "gps lost".to_string(),
        }))
        .build_tracker();

    let session = session_at(RideStatus::Accepted);
    let id = session.id.clone();
    tracker.start(session).expect("start");

    tracker.advance_by(2_000);
    let arriving = tracker.view(&id).expect("view");
    assert_eq!(arriving.status(), RideStatus::ArrivingAtPickup);
    assert!(arriving.location_banner.is_some());

    tracker.advance_by(2_000);
    let at_pickup = tracker.view(&id).expect("view");
    assert_eq!(at_pickup.status(), RideStatus::AtPickup);
    assert_eq!(at_pickup.location_banner, None);
    assert_eq!(tracker.telemetry().location_failures, 1);
}

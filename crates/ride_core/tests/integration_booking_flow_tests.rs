mod support;

use ride_core::booking::{BookingRequest, DriverDirectory, InMemoryDriverDirectory};
use ride_core::error::BookingError;
use ride_core::estimates::{EstimateConfig, PickupEta};
use ride_core::pricing::{calculate_trip_fare, PricingConfig};
use ride_core::session::RideId;
use ride_core::status::RideStatus;
use ride_core::test_helpers::{central_mall, downtown_plaza};
use support::world::TestWorldBuilder;

#[test]
fn booking_to_tracking_keeps_quoted_fare() {
    let directory = InMemoryDriverDirectory::demo_fleet();
    let offers = directory.nearby(downtown_plaza().location, 3, &EstimateConfig::default());
    let chosen = offers.first().expect("a nearby driver");

    let session = BookingRequest::new(downtown_plaza(), central_mall(), chosen.profile.id.clone())
        .confirm(RideId::from_timestamp_ms(1_700_000_000_000), &directory)
        .expect("booking");
    assert_eq!(session.id.as_str(), "ride-1700000000000");

    let mut tracker = TestWorldBuilder::new().with_uniform_edges(0.0).build_tracker();
    let view = tracker.start(session).expect("start");
    let estimates = view.session.estimates.expect("estimates");
    let quoted = calculate_trip_fare(
        downtown_plaza().location,
        central_mall().location,
        &PricingConfig::default(),
    );
    assert_eq!(estimates.fare, quoted);
    assert!(matches!(estimates.pickup_eta, PickupEta::Minutes(m) if m >= 1));
    assert!(estimates.trip_duration_mins >= 1);
}

#[test]
fn swapped_request_books_the_return_trip() {
    let directory = InMemoryDriverDirectory::demo_fleet();
    let session = BookingRequest::new(downtown_plaza(), central_mall(), "2")
        .swapped()
        .confirm(RideId::new("ride-back"), &directory)
        .expect("booking");
    assert_eq!(session.pickup, central_mall());
    assert_eq!(session.destination, downtown_plaza());
    assert_eq!(session.status, RideStatus::Requested);
}

#[test]
fn unknown_driver_is_rejected() {
    let directory = InMemoryDriverDirectory::demo_fleet();
    let err = BookingRequest::new(downtown_plaza(), central_mall(), "99")
        .confirm(RideId::new("ride-x"), &directory)
        .unwrap_err();
    assert_eq!(err, BookingError::UnknownDriver("99".to_string()));
}

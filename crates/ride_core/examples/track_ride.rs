//! Books a ride with the demo fleet and tracks it to the end.
//!
//! Usage: `cargo run -p ride_core --example track_ride [config.json] [cancel-after-ms]`

use std::cell::RefCell;
use std::rc::Rc;

use ride_core::booking::{BookingRequest, DriverDirectory, InMemoryDriverDirectory};
use ride_core::config::TrackerConfig;
use ride_core::error::RideError;
use ride_core::geo::Place;
use ride_core::observer::RideObserver;
use ride_core::presentation::{format_sim_clock, RideView};
use ride_core::session::RideId;
use ride_core::tracker::RideTracker;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints one line per update, like the status card would redraw.
#[derive(Default)]
struct ConsoleObserver {
    lines: usize,
}

impl RideObserver for ConsoleObserver {
    fn on_update(&mut self, view: &RideView) {
        self.lines += 1;
        let eta = view
            .session
            .estimates
            .map(|e| e.pickup_eta.label())
            .unwrap_or_default();
        println!(
            "[{}] {:<28} {:<32} eta={:<10} fare={}",
            format_sim_clock(view.last_updated_at),
            view.binding.title,
            view.detail,
            eta,
            view.session
                .estimates
                .map(|e| e.fare.display_total())
                .unwrap_or_default(),
        );
        if let Some(banner) = &view.location_banner {
            println!("           ! {banner}");
        }
    }

    fn on_error(&mut self, error: &RideError) {
        eprintln!("           error: {error}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next().filter(|path| !path.is_empty()) {
        Some(path) => TrackerConfig::from_json_file(path)?,
        None => TrackerConfig::default().with_seed(7),
    };
    let cancel_after_ms = args.next().map(|raw| raw.parse::<u64>()).transpose()?;

    let directory = InMemoryDriverDirectory::demo_fleet();
    let pickup = Place::new("Downtown Plaza, Main St", 40.712, -74.005);
    let destination = Place::new("Central Mall, Oak Avenue", 40.714, -74.007);
    let offers = directory.nearby(pickup.location, 3, &config.estimates);
    for offer in &offers {
        println!(
            "{} ({}, {}) {:.2} km, {} min away",
            offer.profile.name,
            offer.profile.vehicle_model,
            offer.profile.license_plate,
            offer.distance_km,
            offer.eta_mins,
        );
    }
    let driver_id = offers
        .first()
        .map(|offer| offer.profile.id.clone())
        .ok_or("no drivers nearby")?;

    let session = BookingRequest::new(pickup, destination, driver_id)
        .confirm(RideId::from_timestamp_ms(0), &directory)?;
    let id = session.id.clone();

    let console = Rc::new(RefCell::new(ConsoleObserver::default()));
    let mut tracker = RideTracker::new(config)?;
    tracker.subscribe(Box::new(Rc::clone(&console)));
    tracker.start(session)?;

    let interval = config.progression.tick_interval_ms;
    while tracker.is_tracking(&id) {
        tracker.advance_by(interval);
        if cancel_after_ms.is_some_and(|limit| tracker.now() >= limit) {
            tracker.cancel(&id)?;
        }
    }

    let telemetry = tracker.telemetry();
    println!(
        "{} updates, {} ticks, {} position updates, {} location failures",
        console.borrow().lines,
        telemetry.ticks_processed,
        telemetry.position_updates,
        telemetry.location_failures,
    );
    println!(
        "path: {}",
        telemetry
            .status_path(&id)
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    Ok(())
}

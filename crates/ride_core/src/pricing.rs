//! Fare estimate shown on the booking sheet and the tracking view.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Base fare in currency units (e.g., dollars).
pub const BASE_FARE: f64 = 3.50;

/// Per-kilometer rate in currency units.
pub const PER_KM_RATE: f64 = 2.00;

/// Flat service fee added to every ride.
pub const SERVICE_FEE: f64 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct PricingConfig {
    pub base_fare: f64,
    pub per_km_rate: f64,
    pub service_fee: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_fare: BASE_FARE,
            per_km_rate: PER_KM_RATE,
            service_fee: SERVICE_FEE,
        }
    }
}

/// Line items of a fare quote. Amounts are rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub base: f64,
    pub distance_km: f64,
    pub distance_charge: f64,
    pub service_fee: f64,
    pub total: f64,
}

impl FareBreakdown {
    /// Formats the total as shown in the UI, e.g. `$8.50`.
    pub fn display_total(&self) -> String {
        format!("${:.2}", self.total)
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Calculate the fare for a trip of `distance_km`.
///
/// Formula: `total = base_fare + distance_km * per_km_rate + service_fee`
pub fn calculate_fare(distance_km: f64, config: &PricingConfig) -> FareBreakdown {
    let distance_km = distance_km.max(0.0);
    let distance_charge = round_cents(distance_km * config.per_km_rate);
    let base = round_cents(config.base_fare);
    let service_fee = round_cents(config.service_fee);
    FareBreakdown {
        base,
        distance_km,
        distance_charge,
        service_fee,
        total: round_cents(base + distance_charge + service_fee),
    }
}

pub fn calculate_trip_fare(pickup: GeoPoint, dropoff: GeoPoint, config: &PricingConfig) -> FareBreakdown {
    calculate_fare(pickup.distance_km(dropoff), config)
}

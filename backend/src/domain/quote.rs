//! Quote and route calculation.
//!
//! Distance and duration come from the mapping provider when one is
//! configured; otherwise (or on any provider failure) a deterministic
//! local estimate is used so quoting keeps working offline and stays
//! reproducible in tests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use super::parcel::{LatLng, WeightCategory};
use super::ports::{RouteLeg, RouteSource};

/// Price added per kilometre of driving distance.
pub const PER_KM_RATE: f64 = 0.5;

/// Metres of driving distance per degree of combined lat/lng offset.
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Estimated driving minutes per kilometre.
const MINUTES_PER_KM: f64 = 1.5;

/// Base price for a weight band, before the distance component.
pub fn base_price(weight: WeightCategory) -> f64 {
    match weight {
        WeightCategory::Small => 5.0,
        WeightCategory::Medium => 10.0,
        WeightCategory::Large => 15.0,
    }
}

/// Delivery price for a weight band over a driving distance, rounded to
/// two decimal places.
pub fn quote_amount(weight: WeightCategory, distance_km: f64) -> f64 {
    round_currency(base_price(weight) + distance_km * PER_KM_RATE)
}

fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Deterministic local estimate used when the provider is absent or
/// failing. Manhattan distance over degrees, scaled to metres, with
/// driving time at [`MINUTES_PER_KM`].
pub fn fallback_estimate(origin: LatLng, destination: LatLng) -> RouteLeg {
    let degree_offset = (destination.lat - origin.lat).abs() + (destination.lng - origin.lng).abs();
    let distance_meters = (degree_offset * METERS_PER_DEGREE) as i64;
    let duration_seconds = (distance_meters as f64 / 1000.0 * MINUTES_PER_KM * 60.0) as i64;
    RouteLeg {
        distance_meters,
        duration_seconds,
    }
}

/// Computed route figures for a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteQuote {
    pub distance_km: f64,
    pub duration_mins: i32,
    pub quote_amount: f64,
}

/// Route calculator over an optional mapping provider.
#[derive(Clone)]
pub struct QuoteCalculator {
    source: Option<Arc<dyn RouteSource>>,
}

impl QuoteCalculator {
    /// Build a calculator. `None` routes every request through the
    /// local fallback estimate.
    pub fn new(source: Option<Arc<dyn RouteSource>>) -> Self {
        Self { source }
    }

    /// Calculator with no provider; always uses the fallback.
    pub fn offline() -> Self {
        Self::new(None)
    }

    /// Distance and duration between two points, degrading to the
    /// fallback estimate on provider absence or failure.
    pub async fn leg(&self, origin: LatLng, destination: LatLng) -> RouteLeg {
        if let Some(source) = &self.source {
            match source.distance_matrix(origin, destination).await {
                Ok(leg) => return leg,
                Err(error) => {
                    warn!(%error, "distance matrix lookup failed; using local estimate");
                }
            }
        }
        fallback_estimate(origin, destination)
    }

    /// Distance, duration, and price for a delivery.
    pub async fn compute(
        &self,
        origin: LatLng,
        destination: LatLng,
        weight: WeightCategory,
    ) -> RouteQuote {
        let leg = self.leg(origin, destination).await;
        let distance_km = leg.distance_meters as f64 / 1000.0;
        let duration_mins = (leg.duration_seconds / 60) as i32;
        RouteQuote {
            distance_km,
            duration_mins,
            quote_amount: quote_amount(weight, distance_km),
        }
    }

    /// Provider path encoding for map display. Best effort: `None`
    /// when no provider is configured or the lookup fails.
    pub async fn polyline(&self, origin: LatLng, destination: LatLng) -> Option<String> {
        let source = self.source.as_ref()?;
        match source.route_polyline(origin, destination).await {
            Ok(polyline) => polyline,
            Err(error) => {
                warn!(%error, "route polyline lookup failed");
                None
            }
        }
    }
}

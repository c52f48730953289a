//! Parcel model and delivery state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned when constructing a [`LatLng`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateValidationError {
    /// One of the components is NaN or infinite.
    #[error("coordinates must be finite")]
    NotFinite,
    /// Latitude falls outside [-90, 90].
    #[error("latitude must be within [-90, 90]")]
    LatitudeOutOfRange,
    /// Longitude falls outside [-180, 180].
    #[error("longitude must be within [-180, 180]")]
    LongitudeOutOfRange,
}

/// WGS-84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Validate and construct a coordinate pair.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateValidationError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateValidationError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateValidationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateValidationError::LongitudeOutOfRange);
        }
        Ok(Self { lat, lng })
    }
}

/// Weight band used as the pricing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WeightCategory {
    Small,
    Medium,
    Large,
}

impl WeightCategory {
    /// Canonical wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored enum value is unrecognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised value: {0}")]
pub struct UnrecognisedValue(pub String);

impl FromStr for WeightCategory {
    type Err = UnrecognisedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(UnrecognisedValue(other.to_owned())),
        }
    }
}

/// Delivery lifecycle state.
///
/// Legal transitions form a directed acyclic graph:
///
/// ```text
/// pending ──> in_transit ──> delivered
///    │             │
///    └──> cancelled <──┘
/// ```
///
/// `delivered` and `cancelled` are terminal. Re-applying the current
/// state is treated as a no-op rather than a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl ParcelStatus {
    /// Canonical wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether moving to `next` follows a legal edge.
    ///
    /// `next == self` is allowed so repeated updates stay idempotent.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::InTransit)
                | (Self::Pending, Self::Cancelled)
                | (Self::InTransit, Self::Delivered)
                | (Self::InTransit, Self::Cancelled)
        )
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParcelStatus {
    type Err = UnrecognisedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnrecognisedValue(other.to_owned())),
        }
    }
}

/// Parcel-delivery request owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Parcel {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: Uuid,
    pub pickup_address: String,
    pub destination_address: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub weight_category: WeightCategory,
    pub quote_amount: f64,
    pub distance_km: f64,
    pub duration_mins: i32,
    pub status: ParcelStatus,
    pub present_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Parcel {
    /// Pickup coordinates as a pair.
    pub fn pickup(&self) -> LatLng {
        LatLng {
            lat: self.pickup_lat,
            lng: self.pickup_lng,
        }
    }

    /// Destination coordinates as a pair.
    pub fn destination(&self) -> LatLng {
        LatLng {
            lat: self.destination_lat,
            lng: self.destination_lng,
        }
    }
}

/// Fields required to persist a new parcel.
#[derive(Debug, Clone)]
pub struct NewParcel {
    pub user_id: Uuid,
    pub pickup_address: String,
    pub destination_address: String,
    pub pickup: LatLng,
    pub destination: LatLng,
    pub weight_category: WeightCategory,
    pub quote_amount: f64,
    pub distance_km: f64,
    pub duration_mins: i32,
}

//! Parcel lifecycle orchestration.
//!
//! Validates ownership and state-machine preconditions, invokes the
//! quote calculator where destinations change, and fires best-effort
//! notifications after admin mutations. Transport concerns stay in the
//! HTTP adapter.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::Error;
use super::notify::Notifier;
use super::parcel::{LatLng, NewParcel, Parcel, ParcelStatus, WeightCategory};
use super::ports::{
    ParcelPersistenceError, ParcelRepository, UserPersistenceError, UserRepository,
};
use super::quote::QuoteCalculator;
use super::user::User;

pub(crate) fn map_parcel_persistence_error(error: ParcelPersistenceError) -> Error {
    match error {
        ParcelPersistenceError::Connection { message } => Error::service_unavailable(message),
        ParcelPersistenceError::Query { message } => Error::internal(message),
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("Email already registered"),
    }
}

/// Validated input for parcel creation.
#[derive(Debug, Clone)]
pub struct CreateParcelInput {
    pub pickup_address: String,
    pub destination_address: String,
    pub pickup: LatLng,
    pub destination: LatLng,
    pub weight_category: WeightCategory,
}

/// Owner-supplied destination change. Coordinates are optional;
/// address-only updates do not trigger a recompute.
#[derive(Debug, Clone, Default)]
pub struct DestinationUpdate {
    pub destination_address: Option<String>,
    pub destination: Option<LatLng>,
}

/// Admin-supplied status and/or location change.
#[derive(Debug, Clone, Default)]
pub struct AdminUpdate {
    pub status: Option<ParcelStatus>,
    pub present_location: Option<String>,
}

/// Route figures returned by the route endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RouteDetails {
    pub distance_km: f64,
    pub duration_mins: i32,
    pub polyline: Option<String>,
}

/// Parcel use-cases over injected collaborators.
#[derive(Clone)]
pub struct ParcelService {
    parcels: Arc<dyn ParcelRepository>,
    users: Arc<dyn UserRepository>,
    calculator: QuoteCalculator,
    notifier: Notifier,
}

impl ParcelService {
    /// Assemble the service from its collaborators.
    pub fn new(
        parcels: Arc<dyn ParcelRepository>,
        users: Arc<dyn UserRepository>,
        calculator: QuoteCalculator,
        notifier: Notifier,
    ) -> Self {
        Self {
            parcels,
            users,
            calculator,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> Result<Parcel, Error> {
        self.parcels
            .find_by_id(id)
            .await
            .map_err(map_parcel_persistence_error)?
            .ok_or_else(|| Error::not_found("Parcel not found"))
    }

    /// Create a parcel owned by the caller, quoting the route up front.
    pub async fn create(&self, owner: &User, input: CreateParcelInput) -> Result<Parcel, Error> {
        let quote = self
            .calculator
            .compute(input.pickup, input.destination, input.weight_category)
            .await;

        self.parcels
            .insert(NewParcel {
                user_id: owner.id,
                pickup_address: input.pickup_address,
                destination_address: input.destination_address,
                pickup: input.pickup,
                destination: input.destination,
                weight_category: input.weight_category,
                quote_amount: quote.quote_amount,
                distance_km: quote.distance_km,
                duration_mins: quote.duration_mins,
            })
            .await
            .map_err(map_parcel_persistence_error)
    }

    /// Parcels owned by the caller.
    pub async fn list_owned(&self, owner: &User) -> Result<Vec<Parcel>, Error> {
        self.parcels
            .list_by_owner(owner.id)
            .await
            .map_err(map_parcel_persistence_error)
    }

    /// Every parcel. Callers must have checked the admin role already.
    pub async fn list_all(&self) -> Result<Vec<Parcel>, Error> {
        self.parcels
            .list_all()
            .await
            .map_err(map_parcel_persistence_error)
    }

    /// Read a single parcel; owner or admin only.
    pub async fn get(&self, id: Uuid, caller: &User) -> Result<Parcel, Error> {
        let parcel = self.load(id).await?;
        if parcel.user_id != caller.id && !caller.is_admin {
            return Err(Error::forbidden("Not authorized to view this parcel"));
        }
        Ok(parcel)
    }

    /// Owner-only destination change. Rejected once the parcel reached
    /// a terminal state. Coordinate changes recompute the quote;
    /// address-only changes do not.
    pub async fn update_destination(
        &self,
        id: Uuid,
        caller: &User,
        update: DestinationUpdate,
    ) -> Result<Parcel, Error> {
        let mut parcel = self.load(id).await?;
        if parcel.user_id != caller.id {
            return Err(Error::forbidden("Not authorized to update this parcel"));
        }
        if parcel.status.is_terminal() {
            return Err(Error::conflict(format!(
                "Cannot update parcel with status: {}",
                parcel.status
            )));
        }

        if let Some(address) = update.destination_address {
            parcel.destination_address = address;
        }
        if let Some(destination) = update.destination {
            parcel.destination_lat = destination.lat;
            parcel.destination_lng = destination.lng;

            let quote = self
                .calculator
                .compute(parcel.pickup(), destination, parcel.weight_category)
                .await;
            parcel.distance_km = quote.distance_km;
            parcel.duration_mins = quote.duration_mins;
            parcel.quote_amount = quote.quote_amount;
        }

        self.parcels
            .update(&parcel)
            .await
            .map_err(map_parcel_persistence_error)
    }

    /// Owner-only cancellation. Rejected only for delivered parcels;
    /// cancelling an already-cancelled parcel is a no-op success.
    pub async fn cancel(&self, id: Uuid, caller: &User) -> Result<Parcel, Error> {
        let mut parcel = self.load(id).await?;
        if parcel.user_id != caller.id {
            return Err(Error::forbidden("Not authorized to cancel this parcel"));
        }
        if parcel.status == ParcelStatus::Delivered {
            return Err(Error::conflict("Cannot cancel delivered parcel"));
        }

        parcel.status = ParcelStatus::Cancelled;
        self.parcels
            .update(&parcel)
            .await
            .map_err(map_parcel_persistence_error)
    }

    /// Admin mutation of status and/or present location. Status changes
    /// must follow the state machine. Actual changes trigger one
    /// best-effort notification each; delivery failures never roll back
    /// the persisted mutation.
    pub async fn admin_update(&self, id: Uuid, update: AdminUpdate) -> Result<Parcel, Error> {
        let mut parcel = self.load(id).await?;
        let old_status = parcel.status;
        let old_location = parcel.present_location.clone();

        if let Some(next) = update.status {
            if !old_status.can_transition_to(next) {
                return Err(Error::conflict(format!(
                    "Cannot move parcel from {old_status} to {next}"
                )));
            }
            parcel.status = next;
        }
        if let Some(location) = update.present_location {
            parcel.present_location = Some(location);
        }

        let parcel = self
            .parcels
            .update(&parcel)
            .await
            .map_err(map_parcel_persistence_error)?;

        let owner = self
            .users
            .find_by_id(parcel.user_id)
            .await
            .map_err(map_user_persistence_error)?;
        if let Some(owner) = owner {
            if parcel.status != old_status {
                self.notifier
                    .status_changed(owner.email.clone(), parcel.id, parcel.status)
                    .await;
            }
            if parcel.present_location.is_some() && parcel.present_location != old_location {
                if let Some(location) = &parcel.present_location {
                    self.notifier
                        .location_changed(owner.email.clone(), parcel.id, location)
                        .await;
                }
            }
        }

        Ok(parcel)
    }

    /// Route figures for map display; owner or admin only.
    pub async fn route(&self, id: Uuid, caller: &User) -> Result<RouteDetails, Error> {
        let parcel = self.get(id, caller).await?;
        let origin = parcel.pickup();
        let destination = parcel.destination();

        let quote = self
            .calculator
            .compute(origin, destination, parcel.weight_category)
            .await;
        let polyline = self.calculator.polyline(origin, destination).await;

        Ok(RouteDetails {
            distance_km: quote.distance_km,
            duration_mins: quote.duration_mins,
            polyline,
        })
    }
}

//! PostgreSQL-backed `ParcelRepository` implementation using Diesel ORM.
//!
//! Updates are last-writer-wins: the changeset overwrites the mutable
//! columns without a revision check, matching the port contract.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ParcelPersistenceError, ParcelRepository};
use crate::domain::{NewParcel, Parcel, ParcelStatus};

use super::models::{NewParcelRow, ParcelRow, ParcelUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::parcels;

/// Diesel-backed implementation of the `ParcelRepository` port.
#[derive(Clone)]
pub struct DieselParcelRepository {
    pool: DbPool,
}

impl DieselParcelRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ParcelPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ParcelPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ParcelPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ParcelPersistenceError::connection("database connection error")
        }
        _ => ParcelPersistenceError::query("database error"),
    }
}

fn row_to_parcel(row: ParcelRow) -> Result<Parcel, ParcelPersistenceError> {
    Parcel::try_from(row).map_err(ParcelPersistenceError::query)
}

#[async_trait]
impl ParcelRepository for DieselParcelRepository {
    async fn insert(&self, parcel: NewParcel) -> Result<Parcel, ParcelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewParcelRow {
            id: Uuid::new_v4(),
            user_id: parcel.user_id,
            pickup_address: &parcel.pickup_address,
            destination_address: &parcel.destination_address,
            pickup_lat: parcel.pickup.lat,
            pickup_lng: parcel.pickup.lng,
            destination_lat: parcel.destination.lat,
            destination_lng: parcel.destination.lng,
            weight_category: parcel.weight_category.as_str(),
            quote_amount: parcel.quote_amount,
            distance_km: parcel.distance_km,
            duration_mins: parcel.duration_mins,
            status: ParcelStatus::Pending.as_str(),
        };

        let inserted: ParcelRow = diesel::insert_into(parcels::table)
            .values(&row)
            .returning(ParcelRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_parcel(inserted)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Parcel>, ParcelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ParcelRow> = parcels::table
            .find(id)
            .select(ParcelRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_parcel).transpose()
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Parcel>, ParcelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ParcelRow> = parcels::table
            .filter(parcels::user_id.eq(user_id))
            .order(parcels::created_at.desc())
            .select(ParcelRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_parcel).collect()
    }

    async fn list_all(&self) -> Result<Vec<Parcel>, ParcelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ParcelRow> = parcels::table
            .order(parcels::created_at.desc())
            .select(ParcelRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_parcel).collect()
    }

    async fn update(&self, parcel: &Parcel) -> Result<Parcel, ParcelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ParcelUpdate {
            destination_address: &parcel.destination_address,
            destination_lat: parcel.destination_lat,
            destination_lng: parcel.destination_lng,
            quote_amount: parcel.quote_amount,
            distance_km: parcel.distance_km,
            duration_mins: parcel.duration_mins,
            status: parcel.status.as_str(),
            present_location: parcel.present_location.as_deref(),
            updated_at: Utc::now(),
        };

        let updated: ParcelRow = diesel::update(parcels::table.find(parcel.id))
            .set(&changes)
            .returning(ParcelRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_parcel(updated)
    }

    async fn count_with_status(
        &self,
        status: ParcelStatus,
    ) -> Result<i64, ParcelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        parcels::table
            .filter(parcels::status.eq(status.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count(&self) -> Result<i64, ParcelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        parcels::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

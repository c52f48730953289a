//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion into domain types happens in
//! one place so malformed rows surface as query errors rather than panics.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{EmailAddress, Parcel, ParcelStatus, User, WeightCategory};

use super::schema::{parcels, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(row.email)
            .map_err(|err| format!("user {} has an invalid email: {err}", row.id))?;
        Ok(Self {
            id: row.id,
            email,
            full_name: row.full_name,
            password_hash: row.password_hash,
            is_active: row.is_active,
            is_admin: row.is_admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_admin: bool,
}

/// Row struct for reading from the parcels table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = parcels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParcelRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pickup_address: String,
    pub destination_address: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub weight_category: String,
    pub quote_amount: f64,
    pub distance_km: f64,
    pub duration_mins: i32,
    pub status: String,
    pub present_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ParcelRow> for Parcel {
    type Error = String;

    fn try_from(row: ParcelRow) -> Result<Self, Self::Error> {
        let weight_category: WeightCategory = row
            .weight_category
            .parse()
            .map_err(|err| format!("parcel {}: {err}", row.id))?;
        let status: ParcelStatus = row
            .status
            .parse()
            .map_err(|err| format!("parcel {}: {err}", row.id))?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            pickup_address: row.pickup_address,
            destination_address: row.destination_address,
            pickup_lat: row.pickup_lat,
            pickup_lng: row.pickup_lng,
            destination_lat: row.destination_lat,
            destination_lng: row.destination_lng,
            weight_category,
            quote_amount: row.quote_amount,
            distance_km: row.distance_km,
            duration_mins: row.duration_mins,
            status,
            present_location: row.present_location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating new parcel records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = parcels)]
pub(crate) struct NewParcelRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pickup_address: &'a str,
    pub destination_address: &'a str,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub weight_category: &'a str,
    pub quote_amount: f64,
    pub distance_km: f64,
    pub duration_mins: i32,
    pub status: &'a str,
}

/// Changeset struct for updating the mutable parcel fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = parcels)]
pub(crate) struct ParcelUpdate<'a> {
    pub destination_address: &'a str,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub quote_amount: f64,
    pub distance_km: f64,
    pub duration_mins: i32,
    pub status: &'a str,
    pub present_location: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

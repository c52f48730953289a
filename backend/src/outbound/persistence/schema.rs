//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login email, unique across the table.
        email -> Varchar,
        /// Display name shown in notifications and admin listings.
        full_name -> Varchar,
        /// Password hash in PHC string format.
        password_hash -> Varchar,
        /// Deactivated accounts fail authentication.
        is_active -> Bool,
        /// Grants access to the admin surface.
        is_admin -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp, null until first update.
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Parcel-delivery requests.
    parcels (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning account.
        user_id -> Uuid,
        pickup_address -> Varchar,
        destination_address -> Varchar,
        pickup_lat -> Float8,
        pickup_lng -> Float8,
        destination_lat -> Float8,
        destination_lng -> Float8,
        /// One of `small`, `medium`, `large`.
        weight_category -> Varchar,
        quote_amount -> Float8,
        distance_km -> Float8,
        duration_mins -> Int4,
        /// One of `pending`, `in_transit`, `delivered`, `cancelled`.
        status -> Varchar,
        /// Free-text location set by couriers, null until first update.
        present_location -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp, null until first update.
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(parcels -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(parcels, users);

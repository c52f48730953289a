//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the relational store, the mapping provider, the email provider). Each
//! trait exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::parcel::{LatLng, NewParcel, Parcel, ParcelStatus};
use super::user::{EmailAddress, NewUser, User};

/// Persistence errors raised by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// The unique email constraint rejected the insert.
    #[error("email {email} is already registered")]
    DuplicateEmail { email: String },
}

impl UserPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique-email violations.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Persistence errors raised by [`ParcelRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParcelPersistenceError {
    /// Repository connection could not be established.
    #[error("parcel repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("parcel repository query failed: {message}")]
    Query { message: String },
}

impl ParcelPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, enforcing email uniqueness.
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account by email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// All accounts, newest first.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Total account count and admin count.
    async fn counts(&self) -> Result<UserCounts, UserPersistenceError>;
}

/// Aggregate account counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserCounts {
    pub total: i64,
    pub admins: i64,
}

/// Persistence port for parcels.
#[async_trait]
pub trait ParcelRepository: Send + Sync {
    /// Insert a new parcel with status `pending`.
    async fn insert(&self, parcel: NewParcel) -> Result<Parcel, ParcelPersistenceError>;

    /// Fetch a parcel by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Parcel>, ParcelPersistenceError>;

    /// Parcels owned by the given user, newest first.
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Parcel>, ParcelPersistenceError>;

    /// Every parcel in the store, newest first.
    async fn list_all(&self) -> Result<Vec<Parcel>, ParcelPersistenceError>;

    /// Persist the mutable fields of an existing parcel.
    ///
    /// Last-writer-wins: concurrent updates to the same parcel are not
    /// synchronised against each other.
    async fn update(&self, parcel: &Parcel) -> Result<Parcel, ParcelPersistenceError>;

    /// Total parcel count plus a count for the given status.
    async fn count_with_status(
        &self,
        status: ParcelStatus,
    ) -> Result<i64, ParcelPersistenceError>;

    /// Total parcel count.
    async fn count(&self) -> Result<i64, ParcelPersistenceError>;
}

/// Errors surfaced by the mapping provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteSourceError {
    /// The provider rejected the request.
    #[error("mapping provider rejected the request: {message}")]
    InvalidRequest { message: String },
    /// The provider did not answer within the configured timeout.
    #[error("mapping provider timed out: {message}")]
    Timeout { message: String },
    /// Transport failure or unexpected provider response.
    #[error("mapping provider transport failed: {message}")]
    Transport { message: String },
    /// The provider payload could not be decoded.
    #[error("mapping provider payload could not be decoded: {message}")]
    Decode { message: String },
}

impl RouteSourceError {
    /// Helper for provider-side request rejections.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Helper for timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Provider-reported distance and duration for a coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLeg {
    pub distance_meters: i64,
    pub duration_seconds: i64,
}

/// Port for the external mapping provider.
#[async_trait]
pub trait RouteSource: Send + Sync {
    /// Distance and duration between two points under driving mode,
    /// metric units.
    async fn distance_matrix(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<RouteLeg, RouteSourceError>;

    /// Opaque provider path encoding for map display, when available.
    async fn route_polyline(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<Option<String>, RouteSourceError>;
}

/// Errors surfaced by the email provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailerError {
    /// The provider rejected the message.
    #[error("email provider rejected the message: {message}")]
    Rejected { message: String },
    /// Transport failure reaching the provider.
    #[error("email provider transport failed: {message}")]
    Transport { message: String },
}

impl MailerError {
    /// Helper for provider rejections.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Transactional email message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: EmailAddress,
    pub subject: String,
    pub html_body: String,
}

/// Port for the external email provider.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single message. At-most-once; the caller never retries.
    async fn send(&self, message: EmailMessage) -> Result<(), MailerError>;
}

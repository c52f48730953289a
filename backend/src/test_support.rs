//! Test utilities for the backend crate.
//!
//! Shared in-memory port implementations for unit tests (in `src/`) and
//! integration tests (in `tests/`). Compiled for tests and behind the
//! `test-support` feature only.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{
    EmailMessage, Mailer, MailerError, ParcelPersistenceError, ParcelRepository, RouteLeg,
    RouteSource, RouteSourceError, UserCounts, UserPersistenceError, UserRepository,
};
use crate::domain::{
    EmailAddress, LatLng, NewParcel, NewUser, Parcel, ParcelStatus, User, WeightCategory,
};

/// Build an account for tests. The password hash is a throwaway marker;
/// authentication tests hash real passwords instead.
pub fn test_user(email: &str, is_admin: bool) -> User {
    User {
        id: Uuid::new_v4(),
        email: EmailAddress::new(email).expect("test email is valid"),
        full_name: "Test User".to_owned(),
        password_hash: "unusable-hash".to_owned(),
        is_active: true,
        is_admin,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// Build a pending parcel for tests using New York coordinates.
pub fn test_parcel(owner: Uuid) -> Parcel {
    Parcel {
        id: Uuid::new_v4(),
        user_id: owner,
        pickup_address: "123 Broadway, New York".to_owned(),
        destination_address: "456 Fulton St, Brooklyn".to_owned(),
        pickup_lat: 40.7128,
        pickup_lng: -74.0060,
        destination_lat: 40.6782,
        destination_lng: -73.9442,
        weight_category: WeightCategory::Medium,
        quote_amount: 15.35,
        distance_km: 10.7,
        duration_mins: 16,
        status: ParcelStatus::Pending,
        present_location: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// In-memory `UserRepository` enforcing email uniqueness.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing account.
    pub fn seed(&self, user: User) {
        self.users.lock().expect("lock poisoned").push(user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.users.lock().expect("lock poisoned");
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_str()));
        }
        let stored = User {
            id: Uuid::new_v4(),
            email: user.email,
            full_name: user.full_name,
            password_hash: user.password_hash,
            is_active: true,
            is_admin: user.is_admin,
            created_at: Utc::now(),
            updated_at: None,
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("lock poisoned");
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("lock poisoned");
        Ok(users.iter().find(|user| &user.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut users = self.users.lock().expect("lock poisoned").clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn counts(&self) -> Result<UserCounts, UserPersistenceError> {
        let users = self.users.lock().expect("lock poisoned");
        Ok(UserCounts {
            total: users.len() as i64,
            admins: users.iter().filter(|user| user.is_admin).count() as i64,
        })
    }
}

/// In-memory `ParcelRepository`.
#[derive(Default)]
pub struct InMemoryParcelRepository {
    parcels: Mutex<Vec<Parcel>>,
}

impl InMemoryParcelRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing parcel.
    pub fn seed(&self, parcel: Parcel) {
        self.parcels.lock().expect("lock poisoned").push(parcel);
    }
}

#[async_trait]
impl ParcelRepository for InMemoryParcelRepository {
    async fn insert(&self, parcel: NewParcel) -> Result<Parcel, ParcelPersistenceError> {
        let stored = Parcel {
            id: Uuid::new_v4(),
            user_id: parcel.user_id,
            pickup_address: parcel.pickup_address,
            destination_address: parcel.destination_address,
            pickup_lat: parcel.pickup.lat,
            pickup_lng: parcel.pickup.lng,
            destination_lat: parcel.destination.lat,
            destination_lng: parcel.destination.lng,
            weight_category: parcel.weight_category,
            quote_amount: parcel.quote_amount,
            distance_km: parcel.distance_km,
            duration_mins: parcel.duration_mins,
            status: ParcelStatus::Pending,
            present_location: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.parcels
            .lock()
            .expect("lock poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Parcel>, ParcelPersistenceError> {
        let parcels = self.parcels.lock().expect("lock poisoned");
        Ok(parcels.iter().find(|parcel| parcel.id == id).cloned())
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Parcel>, ParcelPersistenceError> {
        let parcels = self.parcels.lock().expect("lock poisoned");
        Ok(parcels
            .iter()
            .filter(|parcel| parcel.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Parcel>, ParcelPersistenceError> {
        Ok(self.parcels.lock().expect("lock poisoned").clone())
    }

    async fn update(&self, parcel: &Parcel) -> Result<Parcel, ParcelPersistenceError> {
        let mut parcels = self.parcels.lock().expect("lock poisoned");
        let slot = parcels
            .iter_mut()
            .find(|stored| stored.id == parcel.id)
            .ok_or_else(|| ParcelPersistenceError::query("parcel not found for update"))?;
        let mut updated = parcel.clone();
        updated.updated_at = Some(Utc::now());
        *slot = updated.clone();
        Ok(updated)
    }

    async fn count_with_status(
        &self,
        status: ParcelStatus,
    ) -> Result<i64, ParcelPersistenceError> {
        let parcels = self.parcels.lock().expect("lock poisoned");
        Ok(parcels
            .iter()
            .filter(|parcel| parcel.status == status)
            .count() as i64)
    }

    async fn count(&self) -> Result<i64, ParcelPersistenceError> {
        Ok(self.parcels.lock().expect("lock poisoned").len() as i64)
    }
}

/// Mailer that records every accepted message.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailerError> {
        self.sent.lock().expect("lock poisoned").push(message);
        Ok(())
    }
}

/// Route source returning a fixed leg and polyline.
pub struct FixedRouteSource {
    pub leg: RouteLeg,
    pub polyline: Option<String>,
}

#[async_trait]
impl RouteSource for FixedRouteSource {
    async fn distance_matrix(
        &self,
        _origin: LatLng,
        _destination: LatLng,
    ) -> Result<RouteLeg, RouteSourceError> {
        Ok(self.leg)
    }

    async fn route_polyline(
        &self,
        _origin: LatLng,
        _destination: LatLng,
    ) -> Result<Option<String>, RouteSourceError> {
        Ok(self.polyline.clone())
    }
}

/// Route source that always fails, for degradation tests.
pub struct FailingRouteSource;

#[async_trait]
impl RouteSource for FailingRouteSource {
    async fn distance_matrix(
        &self,
        _origin: LatLng,
        _destination: LatLng,
    ) -> Result<RouteLeg, RouteSourceError> {
        Err(RouteSourceError::transport("provider unreachable"))
    }

    async fn route_polyline(
        &self,
        _origin: LatLng,
        _destination: LatLng,
    ) -> Result<Option<String>, RouteSourceError> {
        Err(RouteSourceError::transport("provider unreachable"))
    }
}

//! Admin dashboard queries spanning users and parcels.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::error::Error;
use super::parcel::ParcelStatus;
use super::parcels_service::{map_parcel_persistence_error, map_user_persistence_error};
use super::ports::{ParcelRepository, UserRepository};
use super::user::UserView;

/// Store-wide counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DatabaseStats {
    pub total_users: i64,
    pub total_parcels: i64,
    pub admin_users: i64,
    pub pending_parcels: i64,
    pub delivered_parcels: i64,
}

/// Read-only admin queries over both repositories.
#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserRepository>,
    parcels: Arc<dyn ParcelRepository>,
}

impl AdminService {
    /// Assemble the service from its repositories.
    pub fn new(users: Arc<dyn UserRepository>, parcels: Arc<dyn ParcelRepository>) -> Self {
        Self { users, parcels }
    }

    /// Every registered account, without password hashes.
    pub async fn list_users(&self) -> Result<Vec<UserView>, Error> {
        let users = self
            .users
            .list_all()
            .await
            .map_err(map_user_persistence_error)?;
        Ok(users.iter().map(UserView::from).collect())
    }

    /// Aggregate store counts.
    pub async fn database_stats(&self) -> Result<DatabaseStats, Error> {
        let user_counts = self
            .users
            .counts()
            .await
            .map_err(map_user_persistence_error)?;
        let total_parcels = self
            .parcels
            .count()
            .await
            .map_err(map_parcel_persistence_error)?;
        let pending_parcels = self
            .parcels
            .count_with_status(ParcelStatus::Pending)
            .await
            .map_err(map_parcel_persistence_error)?;
        let delivered_parcels = self
            .parcels
            .count_with_status(ParcelStatus::Delivered)
            .await
            .map_err(map_parcel_persistence_error)?;

        Ok(DatabaseStats {
            total_users: user_counts.total,
            total_parcels,
            admin_users: user_counts.admins,
            pending_parcels,
            delivered_parcels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_parcel, test_user, InMemoryParcelRepository, InMemoryUserRepository};

    #[actix_web::test]
    async fn stats_count_users_parcels_and_statuses() {
        let users = Arc::new(InMemoryUserRepository::new());
        let parcels = Arc::new(InMemoryParcelRepository::new());

        let admin = test_user("admin@example.com", true);
        let customer = test_user("customer@example.com", false);
        users.seed(admin);
        users.seed(customer.clone());

        parcels.seed(test_parcel(customer.id));
        let mut delivered = test_parcel(customer.id);
        delivered.status = ParcelStatus::Delivered;
        parcels.seed(delivered);
        let mut cancelled = test_parcel(customer.id);
        cancelled.status = ParcelStatus::Cancelled;
        parcels.seed(cancelled);

        let service = AdminService::new(users, parcels);
        let stats = service.database_stats().await.expect("stats load");

        assert_eq!(
            stats,
            DatabaseStats {
                total_users: 2,
                total_parcels: 3,
                admin_users: 1,
                pending_parcels: 1,
                delivered_parcels: 1,
            }
        );
    }

    #[actix_web::test]
    async fn user_listing_omits_password_hashes() {
        let users = Arc::new(InMemoryUserRepository::new());
        users.seed(test_user("ada@example.com", false));
        let service = AdminService::new(users, Arc::new(InMemoryParcelRepository::new()));

        let listed = service.list_users().await.expect("listing loads");
        assert_eq!(listed.len(), 1);
        let serialised = serde_json::to_value(&listed).expect("serialises");
        assert!(serialised[0].get("password_hash").is_none());
    }
}

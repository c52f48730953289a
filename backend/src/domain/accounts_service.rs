//! Account registration and credential checks.

use std::sync::Arc;

use uuid::Uuid;

use super::error::Error;
use super::parcels_service::map_user_persistence_error;
use super::password::{hash_password, verify_password};
use super::ports::UserRepository;
use super::user::{EmailAddress, NewUser, User};

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: EmailAddress,
    pub full_name: String,
    pub password: String,
}

/// Account use-cases over the user repository.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    /// Assemble the service from its repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new account. Duplicate emails surface as a conflict
    /// with the message "Email already registered".
    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        if registration.full_name.trim().is_empty() {
            return Err(Error::invalid_request("full_name must not be empty"));
        }
        if registration.password.len() < 8 {
            return Err(Error::invalid_request(
                "password must be at least 8 characters",
            ));
        }

        let password_hash = hash_password(&registration.password)?;
        self.users
            .insert(NewUser {
                email: registration.email,
                full_name: registration.full_name.trim().to_owned(),
                password_hash,
                is_admin: false,
            })
            .await
            .map_err(map_user_persistence_error)
    }

    /// Check login credentials and return the matching active account.
    ///
    /// Unknown email, wrong password, and deactivated accounts all
    /// produce the same unauthorized error.
    pub async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<User, Error> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_persistence_error)?;

        match user {
            Some(user) if user.is_active && verify_password(&user.password_hash, password) => {
                Ok(user)
            }
            _ => Err(Error::unauthorized("Incorrect email or password")),
        }
    }

    /// Resolve a bearer-token subject to an active account.
    pub async fn find_active(&self, id: Uuid) -> Result<Option<User>, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(user.filter(|user| user.is_active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::test_support::{test_user, InMemoryUserRepository};
    use rstest::rstest;

    fn service() -> (AccountService, Arc<InMemoryUserRepository>) {
        let repo = Arc::new(InMemoryUserRepository::new());
        (AccountService::new(repo.clone()), repo)
    }

    fn registration(email: &str) -> Registration {
        Registration {
            email: EmailAddress::new(email).expect("valid email"),
            full_name: "Ada Lovelace".to_owned(),
            password: "correct horse battery".to_owned(),
        }
    }

    #[actix_web::test]
    async fn registration_stores_a_hash_not_the_password() {
        let (service, _) = service();
        let user = service
            .register(registration("ada@example.com"))
            .await
            .expect("registration succeeds");

        assert_ne!(user.password_hash, "correct horse battery");
        assert!(!user.is_admin);
        assert!(user.is_active);
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let (service, _) = service();
        service
            .register(registration("ada@example.com"))
            .await
            .expect("first registration succeeds");

        let err = service
            .register(registration("ada@example.com"))
            .await
            .expect_err("second registration rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Email already registered");
    }

    #[rstest]
    #[case::blank_name("", "secure-password")]
    #[case::short_password("Ada Lovelace", "short")]
    #[actix_web::test]
    async fn invalid_registrations_are_rejected(#[case] full_name: &str, #[case] password: &str) {
        let (service, _) = service();
        let err = service
            .register(Registration {
                email: EmailAddress::new("ada@example.com").expect("valid email"),
                full_name: full_name.to_owned(),
                password: password.to_owned(),
            })
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[actix_web::test]
    async fn authentication_round_trips_registered_credentials() {
        let (service, _) = service();
        let registered = service
            .register(registration("ada@example.com"))
            .await
            .expect("registration succeeds");

        let user = service
            .authenticate(&registered.email, "correct horse battery")
            .await
            .expect("authentication succeeds");
        assert_eq!(user.id, registered.id);
    }

    #[actix_web::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let (service, _) = service();
        service
            .register(registration("ada@example.com"))
            .await
            .expect("registration succeeds");

        let known = EmailAddress::new("ada@example.com").expect("valid email");
        let unknown = EmailAddress::new("nobody@example.com").expect("valid email");
        let wrong_password = service
            .authenticate(&known, "not the password")
            .await
            .expect_err("rejected");
        let unknown_email = service
            .authenticate(&unknown, "correct horse battery")
            .await
            .expect_err("rejected");

        assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
        assert_eq!(wrong_password.message(), unknown_email.message());
    }

    #[actix_web::test]
    async fn inactive_accounts_cannot_authenticate_or_resolve() {
        let (service, repo) = service();
        let mut user = test_user("dormant@example.com", false);
        user.is_active = false;
        repo.seed(user.clone());

        let err = service
            .authenticate(&user.email, "irrelevant")
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert!(service
            .find_active(user.id)
            .await
            .expect("lookup succeeds")
            .is_none());
    }
}

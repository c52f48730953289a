//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use crate::domain::{AccountService, AdminService, ParcelService};

use super::token::TokenCodec;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub parcels: ParcelService,
    pub admin: AdminService,
    pub tokens: TokenCodec,
}

impl HttpState {
    /// Construct state from assembled services.
    pub fn new(
        accounts: AccountService,
        parcels: ParcelService,
        admin: AdminService,
        tokens: TokenCodec,
    ) -> Self {
        Self {
            accounts,
            parcels,
            admin,
            tokens,
        }
    }
}

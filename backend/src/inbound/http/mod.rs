//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod auth;
pub mod error;
pub mod parcels;
pub mod state;
pub mod token;
pub mod users;

pub use error::ApiResult;
pub use token::{TokenCodec, TokenConfig};

//! Domain primitives, services, and ports.
//!
//! Everything here is transport agnostic: entities and value types with
//! their invariants, the quote calculator, the parcel lifecycle and
//! account services, and the ports driven adapters implement.

pub mod accounts_service;
pub mod admin_service;
pub mod error;
pub mod notify;
pub mod parcel;
pub mod parcels_service;
pub mod password;
pub mod ports;
pub mod quote;
pub mod user;

pub use self::accounts_service::{AccountService, Registration};
pub use self::admin_service::{AdminService, DatabaseStats};
pub use self::error::{Error, ErrorCode};
pub use self::notify::Notifier;
pub use self::parcel::{
    CoordinateValidationError, LatLng, NewParcel, Parcel, ParcelStatus, UnrecognisedValue,
    WeightCategory,
};
pub use self::parcels_service::{
    AdminUpdate, CreateParcelInput, DestinationUpdate, ParcelService, RouteDetails,
};
pub use self::quote::{QuoteCalculator, RouteQuote};
pub use self::user::{EmailAddress, EmailValidationError, NewUser, User, UserView};

//! Mapping provider outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `RouteSource`
//! port against the Google Maps web services.

mod dto;
mod http_source;

pub use http_source::GoogleMapsSource;

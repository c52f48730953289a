//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (auth, parcels,
//!   admin)
//! - **Schemas**: Domain types and request DTOs referenced by those paths
//! - **Security**: The bearer-token authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    DatabaseStats, Error, ErrorCode, LatLng, Parcel, ParcelStatus, RouteDetails, UserView,
    WeightCategory,
};
use crate::inbound::http::parcels::{
    AdminUpdateRequest, CreateParcelRequest, UpdateDestinationRequest,
};
use crate::inbound::http::users::{LoginForm, RegisterRequest, TokenResponse};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Courier backend API",
        description = "HTTP interface for parcel delivery requests, tracking, and administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::parcels::create_parcel,
        crate::inbound::http::parcels::list_own_parcels,
        crate::inbound::http::parcels::list_all_parcels,
        crate::inbound::http::parcels::get_parcel,
        crate::inbound::http::parcels::update_destination,
        crate::inbound::http::parcels::cancel_parcel,
        crate::inbound::http::parcels::admin_update_parcel,
        crate::inbound::http::parcels::get_parcel_route,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::database_stats,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserView,
        Parcel,
        ParcelStatus,
        WeightCategory,
        LatLng,
        RouteDetails,
        DatabaseStats,
        RegisterRequest,
        LoginForm,
        TokenResponse,
        CreateParcelRequest,
        UpdateDestinationRequest,
        AdminUpdateRequest,
    )),
    tags(
        (name = "auth", description = "Account registration and login"),
        (name = "parcels", description = "Parcel delivery requests and tracking"),
        (name = "admin", description = "Administrative operations")
    )
)]
pub struct ApiDoc;

//! Parcel API handlers.
//!
//! ```text
//! POST /parcels/                    create a delivery request
//! GET  /parcels/                    list the caller's parcels
//! GET  /parcels/all                 list every parcel (admin)
//! GET  /parcels/{id}                read one parcel
//! PUT  /parcels/{id}/destination    change destination (owner)
//! PUT  /parcels/{id}/cancel         cancel (owner)
//! PUT  /parcels/{id}/admin          set status/location (admin)
//! GET  /parcels/{id}/route          route figures for map display
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AdminUpdate, CreateParcelInput, DestinationUpdate, Error, LatLng, Parcel, ParcelStatus,
    RouteDetails, WeightCategory,
};

use super::auth::{AdminUser, CurrentUser};
use super::state::HttpState;
use super::ApiResult;

/// Request body for `POST /parcels/`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateParcelRequest {
    pub pickup_address: String,
    pub destination_address: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub weight_category: WeightCategory,
}

/// Request body for `PUT /parcels/{id}/destination`.
///
/// Coordinates must be supplied as a pair; supplying only one of
/// latitude/longitude is rejected, as is a blank address.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateDestinationRequest {
    #[serde(default)]
    pub destination_address: Option<String>,
    #[serde(default)]
    pub destination_lat: Option<f64>,
    #[serde(default)]
    pub destination_lng: Option<f64>,
}

/// Request body for `PUT /parcels/{id}/admin`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AdminUpdateRequest {
    #[serde(default)]
    pub status: Option<ParcelStatus>,
    #[serde(default)]
    pub present_location: Option<String>,
}

fn coordinates(lat: f64, lng: f64) -> Result<LatLng, Error> {
    LatLng::new(lat, lng).map_err(|err| Error::invalid_request(err.to_string()))
}

fn non_blank(value: String, field: &str) -> Result<String, Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!(
            "{field} must not be empty"
        )));
    }
    Ok(value)
}

/// Create a parcel-delivery request and quote it.
#[utoipa::path(
    post,
    path = "/parcels/",
    request_body = CreateParcelRequest,
    responses(
        (status = 201, description = "Parcel created", body = Parcel),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "createParcel"
)]
#[post("/")]
pub async fn create_parcel(
    state: web::Data<HttpState>,
    caller: CurrentUser,
    payload: web::Json<CreateParcelRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let input = CreateParcelInput {
        pickup_address: non_blank(payload.pickup_address, "pickup_address")?,
        destination_address: non_blank(payload.destination_address, "destination_address")?,
        pickup: coordinates(payload.pickup_lat, payload.pickup_lng)?,
        destination: coordinates(payload.destination_lat, payload.destination_lng)?,
        weight_category: payload.weight_category,
    };
    let parcel = state.parcels.create(&caller.0, input).await?;
    Ok(HttpResponse::Created().json(parcel))
}

/// List the caller's parcels.
#[utoipa::path(
    get,
    path = "/parcels/",
    responses(
        (status = 200, description = "Parcels", body = [Parcel]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "listOwnParcels"
)]
#[get("/")]
pub async fn list_own_parcels(
    state: web::Data<HttpState>,
    caller: CurrentUser,
) -> ApiResult<web::Json<Vec<Parcel>>> {
    let parcels = state.parcels.list_owned(&caller.0).await?;
    Ok(web::Json(parcels))
}

/// List every parcel (admin only).
#[utoipa::path(
    get,
    path = "/parcels/all",
    responses(
        (status = 200, description = "Parcels", body = [Parcel]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "listAllParcels"
)]
#[get("/all")]
pub async fn list_all_parcels(
    state: web::Data<HttpState>,
    _caller: AdminUser,
) -> ApiResult<web::Json<Vec<Parcel>>> {
    let parcels = state.parcels.list_all().await?;
    Ok(web::Json(parcels))
}

/// Read a single parcel; owner or admin only.
#[utoipa::path(
    get,
    path = "/parcels/{id}",
    params(("id" = Uuid, Path, description = "Parcel identifier")),
    responses(
        (status = 200, description = "Parcel", body = Parcel),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "getParcel"
)]
#[get("/{id}")]
pub async fn get_parcel(
    state: web::Data<HttpState>,
    caller: CurrentUser,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<Parcel>> {
    let parcel = state.parcels.get(id.into_inner(), &caller.0).await?;
    Ok(web::Json(parcel))
}

/// Change a parcel's destination (owner only).
#[utoipa::path(
    put,
    path = "/parcels/{id}/destination",
    params(("id" = Uuid, Path, description = "Parcel identifier")),
    request_body = UpdateDestinationRequest,
    responses(
        (status = 200, description = "Parcel updated", body = Parcel),
        (status = 400, description = "Invalid request or terminal state", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "updateParcelDestination"
)]
#[put("/{id}/destination")]
pub async fn update_destination(
    state: web::Data<HttpState>,
    caller: CurrentUser,
    id: web::Path<Uuid>,
    payload: web::Json<UpdateDestinationRequest>,
) -> ApiResult<web::Json<Parcel>> {
    let payload = payload.into_inner();
    let destination = match (payload.destination_lat, payload.destination_lng) {
        (Some(lat), Some(lng)) => Some(coordinates(lat, lng)?),
        (None, None) => None,
        _ => {
            return Err(Error::invalid_request(
                "destination_lat and destination_lng must be supplied together",
            ))
        }
    };
    let destination_address = payload
        .destination_address
        .map(|address| non_blank(address, "destination_address"))
        .transpose()?;
    let update = DestinationUpdate {
        destination_address,
        destination,
    };
    let parcel = state
        .parcels
        .update_destination(id.into_inner(), &caller.0, update)
        .await?;
    Ok(web::Json(parcel))
}

/// Cancel a parcel (owner only).
#[utoipa::path(
    put,
    path = "/parcels/{id}/cancel",
    params(("id" = Uuid, Path, description = "Parcel identifier")),
    responses(
        (status = 200, description = "Parcel cancelled", body = Parcel),
        (status = 400, description = "Parcel already delivered", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "cancelParcel"
)]
#[put("/{id}/cancel")]
pub async fn cancel_parcel(
    state: web::Data<HttpState>,
    caller: CurrentUser,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<Parcel>> {
    let parcel = state.parcels.cancel(id.into_inner(), &caller.0).await?;
    Ok(web::Json(parcel))
}

/// Set a parcel's status and/or present location (admin only).
///
/// Status changes must follow the delivery state machine. Actual
/// changes notify the owner by email, best effort.
#[utoipa::path(
    put,
    path = "/parcels/{id}/admin",
    params(("id" = Uuid, Path, description = "Parcel identifier")),
    request_body = AdminUpdateRequest,
    responses(
        (status = 200, description = "Parcel updated", body = Parcel),
        (status = 400, description = "Illegal state transition", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "adminUpdateParcel"
)]
#[put("/{id}/admin")]
pub async fn admin_update_parcel(
    state: web::Data<HttpState>,
    _caller: AdminUser,
    id: web::Path<Uuid>,
    payload: web::Json<AdminUpdateRequest>,
) -> ApiResult<web::Json<Parcel>> {
    let payload = payload.into_inner();
    let update = AdminUpdate {
        status: payload.status,
        present_location: payload.present_location,
    };
    let parcel = state.parcels.admin_update(id.into_inner(), update).await?;
    Ok(web::Json(parcel))
}

/// Route figures for map display; owner or admin only.
#[utoipa::path(
    get,
    path = "/parcels/{id}/route",
    params(("id" = Uuid, Path, description = "Parcel identifier")),
    responses(
        (status = 200, description = "Route details", body = RouteDetails),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "getParcelRoute"
)]
#[get("/{id}/route")]
pub async fn get_parcel_route(
    state: web::Data<HttpState>,
    caller: CurrentUser,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<RouteDetails>> {
    let route = state.parcels.route(id.into_inner(), &caller.0).await?;
    Ok(web::Json(route))
}

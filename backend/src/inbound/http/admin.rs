//! Administrative API handlers.
//!
//! ```text
//! GET /admin/users            list every account
//! GET /admin/database-stats   aggregate row counts
//! ```

use actix_web::{get, web};

use crate::domain::{DatabaseStats, Error, UserView};

use super::auth::AdminUser;
use super::state::HttpState;
use super::ApiResult;

/// List every registered account.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "Accounts", body = [UserView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _caller: AdminUser,
) -> ApiResult<web::Json<Vec<UserView>>> {
    let users = state.admin.list_users().await?;
    Ok(web::Json(users))
}

/// Aggregate counts across users and parcels.
#[utoipa::path(
    get,
    path = "/admin/database-stats",
    responses(
        (status = 200, description = "Counts", body = DatabaseStats),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "databaseStats"
)]
#[get("/database-stats")]
pub async fn database_stats(
    state: web::Data<HttpState>,
    _caller: AdminUser,
) -> ApiResult<web::Json<DatabaseStats>> {
    let stats = state.admin.database_stats().await?;
    Ok(web::Json(stats))
}

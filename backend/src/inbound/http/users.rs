//! Account API handlers.
//!
//! ```text
//! POST /auth/register {"email":"ada@example.com","full_name":"Ada","password":"..."}
//! POST /auth/login    username=ada%40example.com&password=...
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::{EmailAddress, Error, Registration, UserView};

use super::state::HttpState;
use super::ApiResult;

/// Registration request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Form-encoded credentials for `POST /auth/login`.
///
/// The `username` field carries the account email, matching the usual
/// OAuth2 password-grant form shape.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Bearer token issued on successful login.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserView),
        (status = 400, description = "Invalid request or duplicate email", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let user = state
        .accounts
        .register(Registration {
            email: parse_email(&payload.email)?,
            full_name: payload.full_name,
            password: payload.password,
        })
        .await?;
    Ok(HttpResponse::Created().json(UserView::from(&user)))
}

/// Exchange form credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Incorrect credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    form: web::Form<LoginForm>,
) -> ApiResult<web::Json<TokenResponse>> {
    let form = form.into_inner();
    let email = parse_email(&form.username)?;
    let user = state.accounts.authenticate(&email, &form.password).await?;
    let access_token = state.tokens.issue(user.id)?;
    Ok(web::Json(TokenResponse {
        access_token,
        token_type: "bearer".to_owned(),
    }))
}

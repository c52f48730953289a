//! Bearer-token extractors used by HTTP handlers.
//!
//! Keep the handler modules focused on request/response mapping by
//! concentrating credential checks and user identity derivation here.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};

use super::state::HttpState;

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Missing authorization header"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Malformed authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("Authorization header must use the Bearer scheme"))
}

async fn resolve_user(req: HttpRequest) -> Result<User, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("application state is not configured"))?;
    let token = bearer_token(&req)?;
    let user_id = state.tokens.verify(&token)?;
    state
        .accounts
        .find_active(user_id)
        .await?
        .ok_or_else(|| Error::unauthorized("Could not validate credentials"))
}

/// The authenticated caller, resolved from the bearer token.
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve_user(req).await.map(CurrentUser) })
    }
}

/// The authenticated caller, additionally required to be an admin.
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = resolve_user(req).await?;
            if !user.is_admin {
                return Err(Error::forbidden("Admin access required"));
            }
            Ok(AdminUser(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[test]
    fn extracts_bearer_token() {
        let req = TestRequest::get()
            .insert_header((AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).expect("token present"), "abc.def.ghi");
    }

    #[rstest]
    #[case::missing(None)]
    #[case::wrong_scheme(Some("Basic dXNlcjpwYXNz"))]
    #[case::bare(Some("abc.def.ghi"))]
    fn rejects_non_bearer_headers(#[case] header: Option<&str>) {
        let mut req = TestRequest::get();
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let err = bearer_token(&req.to_http_request()).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}

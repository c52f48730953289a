//! Server construction and wiring.
//!
//! Assembles outbound adapters into domain services, binds the HTTP
//! surface, and runs the actix server. Route registration lives in
//! [`configure`] so integration tests can mount the same surface on an
//! in-process test service.

mod config;

pub use config::{AppConfig, ConfigError};

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::ports::{Mailer, ParcelRepository, RouteSource, UserRepository};
use crate::domain::{AccountService, AdminService, Notifier, ParcelService, QuoteCalculator};
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{admin, parcels, users, TokenCodec, TokenConfig};
use crate::middleware::RequestId;
use crate::outbound::email::SendGridMailer;
use crate::outbound::maps::GoogleMapsSource;
use crate::outbound::persistence::{self, DbPool, PoolConfig, PoolError};

/// Register the REST surface under its scopes.
///
/// `/parcels/all` must be registered ahead of `/parcels/{id}` so the
/// literal segment wins over the path parameter.
pub fn configure(state: web::Data<HttpState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .service(
                web::scope("/auth")
                    .service(users::register)
                    .service(users::login),
            )
            .service(
                web::scope("/parcels")
                    .service(parcels::list_all_parcels)
                    .service(parcels::create_parcel)
                    .service(parcels::list_own_parcels)
                    .service(parcels::get_parcel_route)
                    .service(parcels::update_destination)
                    .service(parcels::cancel_parcel)
                    .service(parcels::admin_update_parcel)
                    .service(parcels::get_parcel),
            )
            .service(
                web::scope("/admin")
                    .service(admin::list_users)
                    .service(admin::database_stats),
            );
    }
}

fn build_route_source(config: &AppConfig) -> Option<Arc<dyn RouteSource>> {
    let key = config.google_maps_api_key.as_ref()?;
    match GoogleMapsSource::new(key.clone(), config.provider_timeout) {
        Ok(source) => Some(Arc::new(source)),
        Err(err) => {
            warn!(error = %err, "maps client construction failed; using fallback estimates");
            None
        }
    }
}

fn build_mailer(config: &AppConfig) -> Option<Arc<dyn Mailer>> {
    let key = config.sendgrid_api_key.as_ref()?;
    match SendGridMailer::new(key.clone(), config.email_from.clone(), config.provider_timeout) {
        Ok(mailer) => Some(Arc::new(mailer)),
        Err(err) => {
            warn!(error = %err, "mailer construction failed; notifications disabled");
            None
        }
    }
}

/// Assemble domain services over the given pool and configuration.
pub fn build_state(config: &AppConfig, pool: DbPool) -> HttpState {
    let users: Arc<dyn UserRepository> =
        Arc::new(persistence::DieselUserRepository::new(pool.clone()));
    let parcels: Arc<dyn ParcelRepository> =
        Arc::new(persistence::DieselParcelRepository::new(pool));

    let calculator = QuoteCalculator::new(build_route_source(config));
    let notifier = Notifier::new(build_mailer(config), config.frontend_url.clone());

    let tokens = TokenCodec::new(&TokenConfig {
        secret: config.jwt_secret.clone(),
        algorithm: config.jwt_algorithm,
        ttl_minutes: config.token_ttl_minutes,
    });

    HttpState::new(
        AccountService::new(users.clone()),
        ParcelService::new(parcels.clone(), users.clone(), calculator, notifier),
        AdminService::new(users, parcels),
        tokens,
    )
}

/// Run migrations, build the connection pool, and serve until shutdown.
///
/// # Errors
///
/// Returns an error when configuration, migrations, pool construction, or
/// the listener bind fail.
pub async fn run() -> std::io::Result<()> {
    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    persistence::run_migrations(&config.database_url)
        .await
        .map_err(pool_io_error)?;
    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(pool_io_error)?;

    let state = web::Data::new(build_state(&config, pool));
    let bind_addr = config.bind_addr;
    info!(%bind_addr, "starting server");

    HttpServer::new(move || {
        let app = App::new()
            .wrap(RequestId)
            .configure(configure(state.clone()));
        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
        app
    })
    .bind(bind_addr)?
    .run()
    .await
}

fn pool_io_error(err: PoolError) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

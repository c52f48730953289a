//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if dotenvy::dotenv().is_err() {
        // No .env file; the process environment is authoritative.
    }

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    courier_backend::server::run().await
}

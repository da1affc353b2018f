//! Zoo Records Backend
//!
//! A REST backend that stores animal profile records and looks them up by barcode.

mod api;
mod config;
mod db;
mod errors;
mod logging;
mod models;
mod signal;

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;
use errors::ReportedError;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    logging::init(&config);

    tracing::info!("Starting Zoo Records Backend");
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Error reporting: {:?}", config.error_reporting);

    // Storage must be ready before the listener accepts anything
    let pool = match db::init_database(&config.database_url, config.max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to connect to DB: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Connected to DB");

    let state = AppState {
        repo: Arc::new(Repository::new(pool)),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server running on port {}", listener.local_addr()?.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(signal::shutdown())
        .await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Any origin may call the API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/data", get(api::list_records).post(api::create_record))
        .route("/barcode", post(api::find_by_barcode))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Result<&'static str, ReportedError> {
    state
        .repo
        .ping()
        .await
        .map_err(|e| e.report(state.config.error_reporting))?;
    Ok("OK")
}

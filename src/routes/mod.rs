//! Rutas HTTP
//!
//! `create_app` arma el router completo: la API bajo `/api`, las imágenes
//! subidas bajo `/uploads` y el health check.

pub mod customer_routes;
pub mod dashboard_routes;
pub mod reservation_routes;
pub mod upload_routes;
pub mod vehicle_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{compression::CompressionLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::cors::cors_middleware;
use crate::services::image_storage::UPLOADS_URL_PREFIX;
use crate::state::AppState;

pub fn create_api_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(vehicle_routes::create_vehicle_router())
        .merge(customer_routes::create_customer_router())
        .merge(reservation_routes::create_reservation_router())
        .merge(dashboard_routes::create_dashboard_router())
        .merge(upload_routes::create_upload_router(max_upload_bytes))
}

pub fn create_app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.images.root());
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", create_api_router(state.images.max_bytes()))
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

use super::{handlers, ApiState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        // Dashboard page
        .route("/", get(handlers::index).post(handlers::submit_dashboard))

        // JSON routes
        .route("/api/listings", post(handlers::get_listings))
        .route("/api/export", post(handlers::export_listings))
        .route("/api/health", get(handlers::health))

        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

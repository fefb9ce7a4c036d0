use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

const SINGLE_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;
const BATCH_UPLOAD_LIMIT: usize = 50 * 1024 * 1024;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/query-image",
            post(handlers::query_image_handler).layer(DefaultBodyLimit::max(SINGLE_UPLOAD_LIMIT)),
        )
        .route(
            "/query-images",
            post(handlers::query_images_handler).layer(DefaultBodyLimit::max(BATCH_UPLOAD_LIMIT)),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

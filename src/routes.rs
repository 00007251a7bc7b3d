use crate::{config::Config, handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

// Headroom for multipart boundaries and the title field
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>, config: &Config) -> Router {
    let uploads = ServeDir::new(&state.uploads_dir);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/images", get(handlers::list_images))
        .route("/api/images/upload", post(handlers::upload_image))
        .route(
            "/api/images/{id}",
            get(handlers::get_image).delete(handlers::delete_image),
        )
        .route(
            "/api/images/{id}/vote",
            post(handlers::vote).delete(handlers::unvote),
        )
        .route("/api/images/{id}/download", get(handlers::download_image))
        .route("/api/rating", get(handlers::rating))
        .route("/api/contacts", get(handlers::contacts))
        .nest_service("/uploads", uploads)
        // Middleware Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .with_state(state)
}

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Users
        .route("/users", get(handlers::get_users))
        .route("/users", post(handlers::register_user))
        // Catalog
        .route("/books", get(handlers::get_books))
        // Transaction log
        .route("/transactions", get(handlers::get_transactions))
        .route("/transactions", post(handlers::record_transaction))
        // Derived views
        .route("/users/:user_id/borrowed", get(handlers::get_borrowed))
        .route("/users/:user_id/recommendations", get(handlers::get_recommendations))
        .route("/popular", get(handlers::get_popular))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable by anyone, signed in or not. Static assets are not
/// listed here; they are the router's fallback service.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Never touches the database.
        .route("/health", get(|| async { "ok" }))
}

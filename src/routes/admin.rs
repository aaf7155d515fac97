use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Staff pages. The router is merged under the authentication guard; the
/// handler then requires membership "Admin" or "Owner" and answers 403 with
/// the forbidden page otherwise.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        .route("/admin", get(handlers::admin_page))
}

use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Anonymous Router Module
///
/// Sign-in and account recovery pages. A visitor whose cookie still resolves
/// to a session is sent to /index by the guard layer instead.
pub fn anonymous_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(handlers::login_page))
        .route("/forgot", get(handlers::forgot_page))
        .route("/register", get(handlers::register_page))
        // GET /reset-password?key=...
        // Part of the recovery flow, so it shares the anonymous-only policy.
        .route("/reset-password", get(handlers::reset_password_page))
}

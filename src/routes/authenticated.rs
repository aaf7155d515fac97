use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Pages for signed-in users. Every handler here can take `AuthUser`, which
/// the guard layer has already resolved from the session cookie.
///
/// Blacklisted users are redirected to /blacklist by the guard before any of
/// these handlers run, except for /blacklist itself.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /
        // No page of its own, redirects to /index.
        .route("/", get(handlers::root))
        .route("/index", get(handlers::index_page))
        .route("/addgame", get(handlers::add_game_page))
        .route("/games", get(handlers::games_page))
        .route("/download", get(handlers::download_page))
        .route("/settings", get(handlers::settings_page))
        // GET /configure?gameId=...
        // Owner-only, enforced in the handler.
        .route("/configure", get(handlers::configure_page))
        .route("/cookies", get(handlers::cookies_page))
        .route("/accounts", get(handlers::accounts_page))
        // GET /lc
        // Login checker tool.
        .route("/lc", get(handlers::login_checker_page))
        // GET /blacklist
        // Only served when the membership is exactly "Blacklist".
        .route("/blacklist", get(handlers::blacklist_page))
}

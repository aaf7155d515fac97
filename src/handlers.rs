use crate::{
    AppState,
    auth::{AuthUser, INDEX_PATH, redirect},
    error::AppError,
    models::Membership,
    pages::Page,
};
use axum::{
    extract::{Query, State},
    response::{Html, Response},
};
use serde::Deserialize;

/// Result of every page handler.
pub type PageResult = Result<Html<String>, AppError>;

// --- Query Structs ---

/// ConfigureQuery
///
/// Query string of `/configure`. The id is optional at the extractor level so
/// a missing id ends in the same 404 as an unknown one.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfigureQuery {
    /// Id of the game to configure.
    #[serde(rename = "gameId")]
    pub game_id: Option<String>,
}

/// ResetQuery
///
/// Query string of `/reset-password`, as linked from the reset e-mail.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResetQuery {
    /// Reset token issued by the forgot-password flow.
    pub key: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

// --- Handlers with authorization logic ---

/// root
///
/// [Authenticated Route] The site root has no page of its own.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 302, description = "Redirect to /index"))
)]
pub async fn root() -> Response {
    redirect(INDEX_PATH)
}

/// admin_page
///
/// [Authenticated Route] Serves the admin console to staff only.
///
/// *Authorization*: membership must be exactly "Admin" or "Owner". The
/// membership comes from the user the guard already resolved.
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Admin console", body = String, content_type = "text/html"),
        (status = 403, description = "Not staff", body = String, content_type = "text/html"),
        (status = 302, description = "Not signed in")
    )
)]
pub async fn admin_page(user: AuthUser, State(state): State<AppState>) -> PageResult {
    if !user.membership.is_staff() {
        tracing::debug!(user_id = %user.id, membership = %user.membership, "admin page denied");
        return Err(AppError::Forbidden);
    }
    state.pages.render(Page::Admin).await
}

/// configure_page
///
/// [Authenticated Route] Serves the configuration page of one game.
///
/// *Authorization*: **Owner-Only**. A missing id, an unknown game and a game
/// owned by someone else all answer 404, so the page does not reveal which
/// game ids exist.
#[utoipa::path(
    get,
    path = "/configure",
    params(ConfigureQuery),
    responses(
        (status = 200, description = "Configure page", body = String, content_type = "text/html"),
        (status = 404, description = "Unknown or foreign game", body = String, content_type = "text/html"),
        (status = 500, description = "Lookup failed", body = String, content_type = "text/html")
    )
)]
pub async fn configure_page(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ConfigureQuery>,
) -> PageResult {
    let game_id = non_empty(query.game_id).ok_or(AppError::NotFound)?;

    let game = state.repo.find_game(&game_id).await?;
    if game.user_id != user.id {
        return Err(AppError::NotFound);
    }

    state.pages.render(Page::Configure).await
}

/// blacklist_page
///
/// [Authenticated Route] Notice page for blacklisted accounts. Anyone else
/// gets a 404.
#[utoipa::path(
    get,
    path = "/blacklist",
    responses(
        (status = 200, description = "Blacklist notice", body = String, content_type = "text/html"),
        (status = 404, description = "Not blacklisted", body = String, content_type = "text/html")
    )
)]
pub async fn blacklist_page(user: AuthUser, State(state): State<AppState>) -> PageResult {
    if user.membership != Membership::Blacklist {
        return Err(AppError::NotFound);
    }
    state.pages.render(Page::Blacklist).await
}

/// reset_password_page
///
/// [Anonymous Route] Serves the reset form for a known reset key.
#[utoipa::path(
    get,
    path = "/reset-password",
    params(ResetQuery),
    responses(
        (status = 200, description = "Reset form", body = String, content_type = "text/html"),
        (status = 404, description = "Unknown key", body = String, content_type = "text/html"),
        (status = 500, description = "Lookup failed", body = String, content_type = "text/html")
    )
)]
pub async fn reset_password_page(
    State(state): State<AppState>,
    Query(query): Query<ResetQuery>,
) -> PageResult {
    let key = non_empty(query.key).ok_or(AppError::NotFound)?;
    state.repo.find_reset_token(&key).await?;
    state.pages.render(Page::Reset).await
}

// --- Plain pages ---

#[utoipa::path(get, path = "/login", responses((status = 200, description = "Login form", body = String, content_type = "text/html")))]
pub async fn login_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::Login).await
}

#[utoipa::path(get, path = "/forgot", responses((status = 200, description = "Forgot-password form", body = String, content_type = "text/html")))]
pub async fn forgot_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::Forgot).await
}

#[utoipa::path(get, path = "/register", responses((status = 200, description = "Registration form", body = String, content_type = "text/html")))]
pub async fn register_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::Register).await
}

#[utoipa::path(get, path = "/index", responses((status = 200, description = "Landing page", body = String, content_type = "text/html")))]
pub async fn index_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::Index).await
}

#[utoipa::path(get, path = "/addgame", responses((status = 200, description = "Add-game form", body = String, content_type = "text/html")))]
pub async fn add_game_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::AddGame).await
}

#[utoipa::path(get, path = "/games", responses((status = 200, description = "Game list", body = String, content_type = "text/html")))]
pub async fn games_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::Games).await
}

#[utoipa::path(get, path = "/download", responses((status = 200, description = "Downloads", body = String, content_type = "text/html")))]
pub async fn download_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::Download).await
}

#[utoipa::path(get, path = "/settings", responses((status = 200, description = "Account settings", body = String, content_type = "text/html")))]
pub async fn settings_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::Settings).await
}

#[utoipa::path(get, path = "/cookies", responses((status = 200, description = "Cookie manager", body = String, content_type = "text/html")))]
pub async fn cookies_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::Cookies).await
}

#[utoipa::path(get, path = "/accounts", responses((status = 200, description = "Account list", body = String, content_type = "text/html")))]
pub async fn accounts_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::Accounts).await
}

/// Login checker tool.
#[utoipa::path(get, path = "/lc", responses((status = 200, description = "Login checker", body = String, content_type = "text/html")))]
pub async fn login_checker_page(State(state): State<AppState>) -> PageResult {
    state.pages.render(Page::LoginChecker).await
}

/// Fallback for anything the router and the assets directory do not know.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

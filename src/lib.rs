use axum::{
    Router,
    extract::FromRef,
    handler::HandlerWithoutStateExt,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod repository;

// Routers grouped by guard (public, anonymous-only, authenticated, admin).
pub mod routes;
use routes::{admin, anonymous, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use pages::{Page, PageStore};
pub use repository::{FaunaRepository, Repository, RepositoryError, RepositoryState};

/// ApiDoc
///
/// OpenAPI description of the page routes, served at `/api-docs/openapi.json`
/// and browsable under `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root, handlers::index_page, handlers::login_page, handlers::forgot_page,
        handlers::register_page, handlers::reset_password_page, handlers::admin_page,
        handlers::add_game_page, handlers::games_page, handlers::download_page,
        handlers::settings_page, handlers::configure_page, handlers::cookies_page,
        handlers::accounts_page, handlers::login_checker_page, handlers::blacklist_page,
    ),
    tags(
        (name = "portal-pages", description = "Session-gated page routes")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, immutable request context. Cloning is cheap: the repository and
/// page store are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database lookups (sessions, users, games, reset tokens).
    pub repo: RepositoryState,
    /// HTML pages served by the handlers.
    pub pages: PageStore,
    pub config: AppConfig,
}

impl AppState {
    /// Builds the production state: Fauna-backed repository and pages read
    /// from the configured directory.
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            repo: std::sync::Arc::new(FaunaRepository::from_config(&config)),
            pages: PageStore::new(&config.pages_dir),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for PageStore {
    fn from_ref(app_state: &AppState) -> PageStore {
        app_state.pages.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the page table, wires one guard per route group and applies the
/// error-page and observability layers.
pub fn create_router(state: AppState) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    // Unmatched paths are looked up in the assets directory, unguarded.
    let assets = ServeDir::new(&state.config.assets_dir)
        .not_found_service(handlers::not_found.into_service());

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            anonymous::anonymous_routes().route_layer(middleware::from_fn_with_state(
                state.repo.clone(),
                auth::reject_if_authenticated,
            )),
        )
        .merge(
            authenticated::authenticated_routes()
                .merge(admin::admin_routes())
                .route_layer(middleware::from_fn_with_state(
                    state.repo.clone(),
                    auth::require_authenticated,
                )),
        )
        .fallback_service(assets)
        .layer(middleware::from_fn_with_state(
            state.pages.clone(),
            pages::render_error_pages,
        ))
        .with_state(state);

    base_router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Request span carrying method, uri and the `x-request-id` set above, so
/// every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

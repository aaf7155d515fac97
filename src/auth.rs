use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use cookie::Cookie;

use crate::{
    models::{Membership, User},
    repository::{Repository, RepositoryResult, RepositoryState},
};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "Account_Session";

pub const INDEX_PATH: &str = "/index";
pub const LOGIN_PATH: &str = "/login";
pub const BLACKLIST_PATH: &str = "/blacklist";

/// AuthUser
///
/// The user resolved by `require_authenticated` for the current request.
/// The guard stores it in the request extensions; handlers take it as an
/// argument instead of looking the session up a second time.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Ref id of the user document.
    pub id: String,
    /// Tier used for the admin and blacklist page checks.
    pub membership: Membership,
    pub blacklisted: bool,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            membership: user.membership,
            blacklisted: user.blacklisted,
        }
    }
}

/// AuthUser Extractor Implementation
///
/// Only succeeds behind `require_authenticated`. A handler mounted without
/// the guard sends the client to the login page instead of running.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| redirect(LOGIN_PATH))
    }
}

/// 302 Found to `location`.
pub fn redirect(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// session_token
///
/// Returns the value of the session cookie, if any. An empty value counts as
/// no cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| Cookie::parse(cookie.trim()).ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Session token → session → user.
async fn resolve_user(repo: &dyn Repository, token: &str) -> RepositoryResult<User> {
    let session = repo.find_session(token).await?;
    repo.get_user(&session.user_id).await
}

/// reject_if_authenticated
///
/// Guard for anonymous-only pages. A cookie that resolves to a session sends
/// the client to the landing page; a missing cookie or any lookup failure lets
/// the request through.
pub async fn reject_if_authenticated(
    State(repo): State<RepositoryState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(request.headers()) {
        match repo.find_session(&token).await {
            Ok(_) => return redirect(INDEX_PATH),
            Err(err) if !err.is_not_found() => {
                tracing::warn!(error = %err, "session lookup failed, continuing as anonymous");
            }
            Err(_) => {}
        }
    }

    next.run(request).await
}

/// require_authenticated
///
/// Guard for protected pages. Sends anonymous clients and unresolvable
/// sessions to the login page and blacklisted users to the blacklist notice.
/// On success the resolved `AuthUser` is attached to the request.
pub async fn require_authenticated(
    State(repo): State<RepositoryState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return redirect(LOGIN_PATH);
    };

    let user = match resolve_user(repo.as_ref(), &token).await {
        Ok(user) => user,
        Err(err) => {
            if !err.is_not_found() {
                tracing::warn!(error = %err, "session resolution failed");
            }
            return redirect(LOGIN_PATH);
        }
    };

    if user.blacklisted && request.uri().path() != BLACKLIST_PATH {
        tracing::debug!(user_id = %user.id, "blacklisted user redirected");
        return redirect(BLACKLIST_PATH);
    }

    request.extensions_mut().insert(AuthUser::from(user));
    next.run(request).await
}

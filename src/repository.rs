use crate::config::AppConfig;
use crate::models::{Game, Membership, PasswordResetToken, Session, User};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

// --- Index and collection names ---

// These are the names the existing database schema exposes.
pub const SESSIONS_BY_TOKEN: &str = "sessions_by_token";
pub const USERS: &str = "users";
pub const USERS_GAMES_BY_GAME_ID: &str = "users_games_by_game_id";
pub const PASSWORD_RESET_TOKENS_BY_TOKEN: &str = "password_reset_tokens_by_token";

/// Error code the database reports for a missing document or empty match.
const INSTANCE_NOT_FOUND: &str = "instance not found";

/// Convenient result alias returning [`RepositoryError`] failures.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures a lookup can end with.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The index match or ref did not resolve to a document.
    #[error("document not found")]
    NotFound,
    /// The query could not be sent or its body could not be read.
    #[error("failed to reach the database")]
    Request(#[source] reqwest::Error),
    /// The database answered with an unexpected status.
    #[error("unexpected database response status {status} ({code})")]
    Status { status: u16, code: String },
    /// The document did not have the expected shape.
    #[error("failed to decode database response")]
    Decode(#[source] serde_json::Error),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound)
    }
}

/// Repository Trait
///
/// The read-only lookups the router performs. Handlers and guards only see
/// this contract, so tests substitute an in-memory double.
///
/// Every method returns `RepositoryError::NotFound` when nothing matches.
#[async_trait]
pub trait Repository: Send + Sync {
    // Resolves a session cookie value through `sessions_by_token`.
    async fn find_session(&self, token: &str) -> RepositoryResult<Session>;
    // Fetches a document of the `users` collection by ref id.
    async fn get_user(&self, id: &str) -> RepositoryResult<User>;
    // Resolves a game through `users_games_by_game_id`.
    async fn find_game(&self, game_id: &str) -> RepositoryResult<Game>;
    // Resolves a reset key through `password_reset_tokens_by_token`.
    async fn find_reset_token(&self, token: &str) -> RepositoryResult<PasswordResetToken>;
}

/// RepositoryState
///
/// The shared handle to the persistence layer stored in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;

// --- Wire format ---

#[derive(Deserialize)]
struct QueryResponse<T> {
    resource: T,
}

#[derive(Deserialize)]
struct ErrorResponse {
    errors: Vec<QueryError>,
}

#[derive(Deserialize)]
struct QueryError {
    code: String,
}

#[derive(Deserialize)]
struct Document<T> {
    #[serde(rename = "ref")]
    reference: RefValue,
    data: T,
}

#[derive(Deserialize)]
struct RefValue {
    #[serde(rename = "@ref")]
    inner: RefInner,
}

#[derive(Deserialize)]
struct RefInner {
    id: String,
}

#[derive(Deserialize)]
struct SessionData {
    user: RefValue,
}

#[derive(Deserialize)]
struct UserData {
    #[serde(default)]
    membership: Membership,
    #[serde(default)]
    blacklistinfo: BlacklistInfo,
}

#[derive(Deserialize, Default)]
struct BlacklistInfo {
    #[serde(default)]
    status: bool,
}

#[derive(Deserialize)]
struct GameData {
    user_id: IdValue,
}

// Owner ids have been written both as strings and as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(i64),
}

impl From<IdValue> for String {
    fn from(value: IdValue) -> Self {
        match value {
            IdValue::Text(text) => text,
            IdValue::Number(number) => number.to_string(),
        }
    }
}

// --- Query expressions ---

/// `Get(Match(Index(index), term))`
fn get_by_index(index: &str, term: &str) -> Value {
    json!({ "get": { "match": { "index": index }, "terms": term } })
}

/// `Get(Ref(Collection(collection), id))`
fn get_by_ref(collection: &str, id: &str) -> Value {
    json!({ "get": { "ref": { "collection": collection }, "id": id } })
}

/// FaunaRepository
///
/// `Repository` backed by the hosted document database. Each lookup is a
/// single FQL query posted as JSON; the `reqwest::Client` pools connections
/// and is shared by all concurrent requests.
#[derive(Clone)]
pub struct FaunaRepository {
    client: Client,
    endpoint: Arc<str>,
    secret: Arc<str>,
}

impl FaunaRepository {
    pub fn new(endpoint: &str, secret: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: Arc::from(endpoint),
            secret: Arc::from(secret),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.fauna_endpoint, &config.fauna_secret)
    }

    async fn query<T: DeserializeOwned>(&self, expr: Value) -> RepositoryResult<T> {
        let response = self
            .client
            .post(self.endpoint.as_ref())
            .bearer_auth(self.secret.as_ref())
            .header("X-FaunaDB-API-Version", "4")
            .json(&expr)
            .send()
            .await
            .map_err(RepositoryError::Request)?;

        let status = response.status();
        let body = response.bytes().await.map_err(RepositoryError::Request)?;

        if status.is_success() {
            let parsed: QueryResponse<T> =
                serde_json::from_slice(&body).map_err(RepositoryError::Decode)?;
            return Ok(parsed.resource);
        }

        let code = serde_json::from_slice::<ErrorResponse>(&body)
            .ok()
            .and_then(|response| response.errors.into_iter().next())
            .map(|error| error.code)
            .unwrap_or_default();

        if status == StatusCode::NOT_FOUND || code == INSTANCE_NOT_FOUND {
            return Err(RepositoryError::NotFound);
        }

        tracing::error!(%status, %code, "database query failed");
        Err(RepositoryError::Status {
            status: status.as_u16(),
            code,
        })
    }
}

#[async_trait]
impl Repository for FaunaRepository {
    async fn find_session(&self, token: &str) -> RepositoryResult<Session> {
        let document: Document<SessionData> =
            self.query(get_by_index(SESSIONS_BY_TOKEN, token)).await?;

        Ok(Session {
            token: token.to_string(),
            user_id: document.data.user.inner.id,
        })
    }

    async fn get_user(&self, id: &str) -> RepositoryResult<User> {
        let document: Document<UserData> = self.query(get_by_ref(USERS, id)).await?;

        Ok(User {
            id: document.reference.inner.id,
            membership: document.data.membership,
            blacklisted: document.data.blacklistinfo.status,
        })
    }

    async fn find_game(&self, game_id: &str) -> RepositoryResult<Game> {
        let document: Document<GameData> = self
            .query(get_by_index(USERS_GAMES_BY_GAME_ID, game_id))
            .await?;

        Ok(Game {
            id: game_id.to_string(),
            user_id: document.data.user_id.into(),
        })
    }

    async fn find_reset_token(&self, token: &str) -> RepositoryResult<PasswordResetToken> {
        let _document: Document<Value> = self
            .query(get_by_index(PASSWORD_RESET_TOKENS_BY_TOKEN, token))
            .await?;

        Ok(PasswordResetToken {
            token: token.to_string(),
        })
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use portal_router::{
    AppConfig, AppState, Page, PageStore, create_router,
    models::{Game, Membership, PasswordResetToken, Session, User},
    repository::{Repository, RepositoryError, RepositoryResult},
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ALL_PAGES: [Page; 18] = [
    Page::Index,
    Page::Login,
    Page::Forgot,
    Page::Register,
    Page::Reset,
    Page::Admin,
    Page::AddGame,
    Page::Games,
    Page::Download,
    Page::Settings,
    Page::Configure,
    Page::Cookies,
    Page::Accounts,
    Page::LoginChecker,
    Page::Blacklist,
    Page::Forbidden,
    Page::NotFound,
    Page::ServerError,
];

// --- Mock Repository ---

/// In-memory database double. Lookups for unknown keys end in `NotFound`;
/// the `fail_*` switches turn a lookup into an unexpected failure.
#[derive(Default)]
pub struct MockRepo {
    pub sessions: HashMap<String, String>,
    pub users: HashMap<String, User>,
    pub games: HashMap<String, Game>,
    pub reset_tokens: Vec<String>,
    pub fail_sessions: bool,
    pub fail_users: bool,
    pub fail_games: bool,
    pub fail_reset_tokens: bool,
    pub session_lookups: AtomicUsize,
    pub user_lookups: AtomicUsize,
}

fn unexpected() -> RepositoryError {
    RepositoryError::Status {
        status: 500,
        code: "internal error".to_string(),
    }
}

impl MockRepo {
    /// Adds a user with a live session behind `token`.
    pub fn with_session(mut self, token: &str, user: User) -> Self {
        self.sessions.insert(token.to_string(), user.id.clone());
        self.users.insert(user.id.clone(), user);
        self
    }

    pub fn with_game(mut self, game_id: &str, owner_id: &str) -> Self {
        self.games.insert(
            game_id.to_string(),
            Game {
                id: game_id.to_string(),
                user_id: owner_id.to_string(),
            },
        );
        self
    }

    pub fn with_reset_token(mut self, token: &str) -> Self {
        self.reset_tokens.push(token.to_string());
        self
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn find_session(&self, token: &str) -> RepositoryResult<Session> {
        self.session_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_sessions {
            return Err(unexpected());
        }
        self.sessions
            .get(token)
            .map(|user_id| Session {
                token: token.to_string(),
                user_id: user_id.clone(),
            })
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_user(&self, id: &str) -> RepositoryResult<User> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_users {
            return Err(unexpected());
        }
        self.users.get(id).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn find_game(&self, game_id: &str) -> RepositoryResult<Game> {
        if self.fail_games {
            return Err(unexpected());
        }
        self.games.get(game_id).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn find_reset_token(&self, token: &str) -> RepositoryResult<PasswordResetToken> {
        if self.fail_reset_tokens {
            return Err(unexpected());
        }
        self.reset_tokens
            .iter()
            .find(|known| known.as_str() == token)
            .map(|known| PasswordResetToken {
                token: known.clone(),
            })
            .ok_or(RepositoryError::NotFound)
    }
}

// --- Fixtures ---

pub fn user(id: &str, membership: &str) -> User {
    User {
        id: id.to_string(),
        membership: Membership::from(membership),
        blacklisted: false,
    }
}

pub fn blacklisted_user(id: &str, membership: &str) -> User {
    User {
        blacklisted: true,
        ..user(id, membership)
    }
}

/// Body every test page is written with.
pub fn page_body(page: Page) -> String {
    format!("<h1>{}</h1>", page.file_name())
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MockRepo>,
    // Keeps the pages directory alive for the duration of the test.
    pub dir: TempDir,
}

/// Writes every page plus one asset into a temp dir and builds the router
/// around `repo`.
pub fn app(repo: MockRepo) -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    for page in ALL_PAGES {
        std::fs::write(dir.path().join(page.file_name()), page_body(page)).unwrap();
    }
    let assets = dir.path().join("public");
    std::fs::create_dir_all(&assets).unwrap();
    std::fs::write(assets.join("style.css"), "body { color: black; }").unwrap();

    let config = AppConfig {
        pages_dir: dir.path().to_string_lossy().into_owned(),
        assets_dir: assets.to_string_lossy().into_owned(),
        ..AppConfig::default()
    };

    let repo = Arc::new(repo);
    let state = AppState {
        repo: repo.clone(),
        pages: PageStore::new(dir.path()),
        config,
    };

    TestApp {
        router: create_router(state),
        repo,
        dir,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str, session: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(token) = session {
            request = request.header(header::COOKIE, format!("Account_Session={}", token));
        }
        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{Html, Response},
};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::error::AppError;

/// Page
///
/// Every HTML file the router can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Login,
    Forgot,
    Register,
    Reset,
    Admin,
    AddGame,
    Games,
    Download,
    Settings,
    Configure,
    Cookies,
    Accounts,
    LoginChecker,
    Blacklist,
    Forbidden,
    NotFound,
    ServerError,
}

impl Page {
    pub fn file_name(self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::Login => "login.html",
            Page::Forgot => "forgot.html",
            Page::Register => "register.html",
            Page::Reset => "reset.html",
            Page::Admin => "admin.html",
            Page::AddGame => "addgame.html",
            Page::Games => "games.html",
            Page::Download => "download.html",
            Page::Settings => "settings.html",
            Page::Configure => "configure.html",
            Page::Cookies => "cookies.html",
            Page::Accounts => "accounts.html",
            Page::LoginChecker => "loginchecker.html",
            Page::Blacklist => "blacklist.html",
            Page::Forbidden => "403.html",
            Page::NotFound => "404.html",
            Page::ServerError => "500.html",
        }
    }
}

/// PageStore
///
/// Reads page files from the pages directory on every request. Nothing is
/// cached, so edited pages are served immediately.
#[derive(Clone, Debug)]
pub struct PageStore {
    root: Arc<Path>,
}

impl PageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        Self {
            root: Arc::from(root),
        }
    }

    pub fn path(&self, page: Page) -> PathBuf {
        self.root.join(page.file_name())
    }

    pub async fn load(&self, page: Page) -> io::Result<String> {
        tokio::fs::read_to_string(self.path(page)).await
    }

    /// Loads `page` as a 200 HTML response body.
    pub async fn render(&self, page: Page) -> Result<Html<String>, AppError> {
        self.load(page)
            .await
            .map(Html)
            .map_err(|source| AppError::Page {
                page: page.file_name(),
                source,
            })
    }
}

/// ErrorPage
///
/// Response extension set by `AppError`, naming the page that replaces the
/// plain-text error body.
#[derive(Debug, Clone, Copy)]
pub struct ErrorPage(pub Page);

/// render_error_pages
///
/// Outermost page middleware. Responses tagged with `ErrorPage` keep their
/// status but get the HTML file as body. If the file cannot be read the
/// plain-text body is left in place.
pub async fn render_error_pages(
    State(pages): State<PageStore>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let Some(ErrorPage(page)) = response.extensions().get::<ErrorPage>().copied() else {
        return response;
    };

    match pages.load(page).await {
        Ok(html) => {
            let (mut parts, _) = response.into_parts();
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(html))
        }
        Err(err) => {
            tracing::error!(page = page.file_name(), error = %err, "error page unavailable");
            response
        }
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::io;
use thiserror::Error;

use crate::{
    pages::{ErrorPage, Page},
    repository::RepositoryError,
};

/// Errors a page handler can end with. Each maps to one status code and the
/// HTML page rendered for it.
#[derive(Debug, Error)]
pub enum AppError {
    /// The requested resource does not exist or is hidden from this user.
    #[error("not found")]
    NotFound,
    /// The user is authenticated but lacks the required membership.
    #[error("forbidden")]
    Forbidden,
    /// A database lookup failed. `NotFound` lookups become 404s.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// A page file could not be read from the pages directory.
    #[error("failed to read page `{page}`")]
    Page {
        page: &'static str,
        #[source]
        source: io::Error,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Repository(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Repository(_) | AppError::Page { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let page = match status {
            StatusCode::NOT_FOUND => Page::NotFound,
            StatusCode::FORBIDDEN => Page::Forbidden,
            _ => {
                tracing::error!(error = ?self, "request failed");
                Page::ServerError
            }
        };

        // Plain-text body kept when the error page itself cannot be read.
        let fallback = status.canonical_reason().unwrap_or("Error");
        let mut response = (status, fallback).into_response();
        response.extensions_mut().insert(ErrorPage(page));
        response
    }
}

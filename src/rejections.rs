use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::views;

#[derive(Debug)]
pub enum AppError {
    Internal(&'static str),
    Unauthorized,
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        };

        let page = views::page(
            "Error",
            html! {
                h1 { (message) }
                p { a href="/" { "Back to home" } }
            },
        );

        (code, page).into_response()
    }
}

/// Log-and-map adapter from fallible calls to `AppError`, so handlers stay a
/// chain of `?`s.
pub trait ResultExt<T> {
    fn reject(self, msg: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{msg}: {e}");
            AppError::Internal(msg)
        })
    }
}

/// Not-found adapter for `Option`s coming out of lookups by id.
pub trait OptionExt<T> {
    fn reject_not_found(self) -> Result<T, AppError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn reject_not_found(self) -> Result<T, AppError> {
        self.ok_or(AppError::NotFound)
    }
}

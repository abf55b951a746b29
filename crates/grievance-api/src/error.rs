use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failures surfaced to the browser as plain text.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Passwords don't match!")]
    PasswordMismatch,

    #[error("User already exists")]
    UserExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    /// The message is the route's generic failure text; details only go to the log.
    #[error("{0}")]
    Internal(&'static str),
}

impl AppError {
    /// Build a `map_err` adapter that logs the underlying error and hides it
    /// behind `message`.
    pub fn internal<E: Display>(message: &'static str) -> impl FnOnce(E) -> Self {
        move |e| {
            error!("{}: {}", message, e);
            AppError::Internal(message)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::PasswordMismatch => StatusCode::BAD_REQUEST,
            AppError::UserExists => StatusCode::CONFLICT,
            AppError::UserNotFound | AppError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

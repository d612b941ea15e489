//! Mapping of storefront errors onto HTTP responses.

use crate::errors::Error;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Errors a handler can return
#[derive(Error, Debug)]
pub enum AppError {
    /// The request body could not be read as the expected form
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Anything raised by the storefront itself
    #[error(transparent)]
    Store(#[from] Error),
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::MalformedPayload(err.body_text())
    }
}

impl AppError {
    /// HTTP status for this error
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::Store(err) => match err {
                Error::NotFound { .. } | Error::UnknownEntity { .. } => StatusCode::NOT_FOUND,
                Error::Validation { .. }
                | Error::InvalidForm { .. }
                | Error::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                Error::EmailTaken { .. } => StatusCode::CONFLICT,
                Error::Config { .. }
                | Error::Database(_)
                | Error::Io(_)
                | Error::EnvVar(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::not_found("products", 1), StatusCode::NOT_FOUND),
            (
                Error::UnknownEntity {
                    name: "user".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (Error::validation("bad"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                Error::InvalidTransition {
                    from: "delivered".to_string(),
                    to: "paid".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                Error::EmailTaken {
                    email: "a@b.c".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                Error::Config {
                    message: "x".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
        assert_eq!(
            AppError::MalformedPayload("eof".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}

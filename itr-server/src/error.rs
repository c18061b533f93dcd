//! API error type.
//!
//! Every failure leaves the server as `{ "code": ..., "message": ... }`.
//!
//! | variant      | status | code                          |
//! |--------------|--------|-------------------------------|
//! | `Engine`     | 400    | from [`TaxEngineError::code`] |
//! | `BadRequest` | 400    | `BAD_REQUEST`                 |
//! | `NotFound`   | 404    | `NOT_FOUND`                   |
//! | `Repository` | 500    | `INTERNAL_ERROR`              |

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use itr_core::{RepositoryError, TaxEngineError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] TaxEngineError),

    /// Malformed request body or query string.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ApiError::NotFound("resource not found".to_string()),
            other => ApiError::Repository(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Engine(e) => e.code(),
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Repository(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Repository(e) => {
                error!(error = %e, "repository failure");
                "internal server error".to_string()
            }
            other => {
                warn!(code = other.code(), error = %other, "request rejected");
                other.to_string()
            }
        };
        let body = ErrorBody {
            code: self.code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn engine_errors_are_bad_requests() {
        let err = ApiError::from(TaxEngineError::MissingRequiredField("basic"));

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "MISSING_REQUIRED_FIELD");
        assert_eq!(err.to_string(), "missing required field 'basic'");
    }

    #[test]
    fn repository_not_found_is_404() {
        let err = ApiError::from(RepositoryError::NotFound);

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn other_repository_errors_are_500() {
        let err = ApiError::from(RepositoryError::Database("disk I/O error".to_string()));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn repository_failure_response_is_500() {
        let response =
            ApiError::from(RepositoryError::Connection("password=hunter2".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! API failure responses.
//!
//! Every store failure becomes a 500 with a fixed, operation-specific message.
//! The underlying error is logged, never sent to the client. Requests the
//! extractors reject keep their status but get the same `{error}` body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::api::ErrorBody;
use crate::error::Error;

#[derive(Debug)]
pub enum ApiError {
    /// The store failed.
    Store {
        message: &'static str,
        source: Error,
    },
    /// The request could not be decoded.
    Rejected {
        status: StatusCode,
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// Build a `map_err` adapter carrying the client-facing message.
    pub fn with(message: &'static str) -> impl FnOnce(Error) -> Self {
        move |source| Self::Store { message, source }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: "Invalid request body",
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: "Invalid item id",
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Store { message, source } => {
                error!(error = %source, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            Self::Rejected {
                status,
                message,
                detail,
            } => {
                warn!(%status, %detail, "{message}");
                (status, message)
            }
        };
        (
            status,
            Json(ErrorBody {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

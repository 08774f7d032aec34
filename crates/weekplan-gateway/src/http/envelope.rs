//! JSON envelope shared by every endpoint.
//!
//! Success: `{"status": "Success", "message": "Success", "data": ...}`
//! Failure: `{"status": "<label>", "message": "<reason>"}`
//!
//! Store failures are logged with full detail and answered with a fixed
//! message; backend error text never reaches the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::warn;
use weekplan_core::EmailRejection;

pub type ApiResult = Result<Response, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("Access denied!")]
    Forbidden,

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::NotFound(_) => "Not Found",
            ApiError::Forbidden => "Forbidden",
            ApiError::Internal(_) => "Error",
        }
    }

    pub fn email_not_found() -> Self {
        ApiError::NotFound("Email is not found".to_string())
    }

    /// Log `source` and hide it behind `message`.
    pub fn internal(message: &'static str, source: impl std::fmt::Display) -> Self {
        warn!(error = %source, "{message}");
        ApiError::Internal(message)
    }
}

impl From<EmailRejection> for ApiError {
    fn from(rejection: EmailRejection) -> Self {
        match rejection {
            EmailRejection::Empty => ApiError::BadRequest("Email is required"),
            EmailRejection::MissingAt => ApiError::BadRequest("Invalid email"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": self.label(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct Envelope<T> {
    status: &'static str,
    message: &'static str,
    data: T,
}

/// Wrap `data` in the success envelope.
pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    let body = Envelope {
        status: "Success",
        message: "Success",
        data,
    };
    (status, Json(body)).into_response()
}

/// Decode a JSON request body. Anything that does not decode, including an
/// empty body, is a bad request.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::BadRequest("Invalid request body"))
}

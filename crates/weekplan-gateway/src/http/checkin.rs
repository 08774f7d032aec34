//! Check-in endpoint — POST /checkin
//!
//! Request:  `{"email": "a@b.com"}`
//! Response: `{"status": "Success", "message": "Success",
//!             "data": {"id": 1, "email": "a@b.com", "createdAt": "...", "updatedAt": "..."}}`
//!
//! Creates the user on first sight of an email, otherwise returns the
//! existing one. Both cases answer 200.

use axum::{body::Bytes, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use weekplan_core::Email;

use super::envelope::{parse_body, success, ApiError, ApiResult};
use crate::app::AppState;

#[derive(Deserialize)]
struct CheckinBody {
    /// Absent and `null` are treated the same as empty.
    #[serde(default)]
    email: Option<String>,
}

/// POST /checkin — create-or-retrieve a user by email.
pub async fn checkin_handler(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    // A bare `null` body decodes to no fields at all.
    let req: Option<CheckinBody> = parse_body(&body)?;
    let raw = req.and_then(|r| r.email).unwrap_or_default();
    let email = Email::parse(&raw)?;

    let outcome = state
        .users
        .check_in(&email)
        .map_err(|e| ApiError::internal("Failed to create user record", e))?;
    Ok(success(StatusCode::OK, outcome.into_user()))
}

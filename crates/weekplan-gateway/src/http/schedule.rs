//! Schedule endpoints — all on `/schedule`, keyed by `?email=`.
//!
//! | Method | Query          | Body               | Success |
//! |--------|----------------|--------------------|---------|
//! | POST   | email          | `{title, day}`     | 201     |
//! | GET    | email, day?    | —                  | 200     |
//! | PATCH  | email, id      | `{title}`          | 201     |
//! | DELETE | email, id      | —                  | 200     |
//!
//! The user is always resolved through the directory; schedules are always
//! read from the store.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use weekplan_core::{Day, Email};
use weekplan_schedules::{Schedule, ScheduleError};
use weekplan_users::{User, UserError};

use super::envelope::{parse_body, success, ApiError, ApiResult};
use crate::app::AppState;

/// Raw query string. Every field is optional here so each missing or
/// malformed value gets its own message instead of a generic rejection.
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub email: Option<String>,
    pub id: Option<String>,
    pub day: Option<String>,
}

#[derive(Deserialize)]
struct AddBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    day: String,
}

#[derive(Deserialize)]
struct EditBody {
    #[serde(default)]
    title: String,
}

/// POST /schedule — create a schedule for the user behind `email`.
pub async fn add_schedule(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
    body: Bytes,
) -> ApiResult {
    let query = query_params(query)?;
    let email = required_email(&query)?;
    let user = resolve_user(&state, &email, "Failed to create schedule")?;

    let req: AddBody = parse_body(&body)?;
    if req.title.is_empty() {
        return Err(ApiError::BadRequest("Title is required"));
    }
    if req.day.is_empty() {
        return Err(ApiError::BadRequest("Day is required"));
    }
    let day = parse_day(&req.day)?;

    let schedule = state
        .schedules
        .create(user.id, &req.title, day)
        .map_err(|e| ApiError::internal("Failed to create schedule", e))?;
    Ok(success(StatusCode::CREATED, schedule))
}

/// GET /schedule — all schedules bucketed by day, or a flat list for one
/// day when `day` is given.
pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> ApiResult {
    let query = query_params(query)?;
    let email = required_email(&query)?;
    let user = resolve_user(&state, &email, "Failed to query database")?;

    // An empty `day=` is the same as no filter.
    match query.day.as_deref().filter(|d| !d.is_empty()) {
        None => {
            let week = state
                .schedules
                .week_for_user(user.id)
                .map_err(|e| ApiError::internal("Failed to query database", e))?;
            Ok(success(StatusCode::OK, week))
        }
        Some(raw) => {
            let day = parse_day(raw)?;
            let schedules = state
                .schedules
                .list_for_user_on(user.id, day)
                .map_err(|e| ApiError::internal("Failed to query database", e))?;
            Ok(success(StatusCode::OK, schedules))
        }
    }
}

/// PATCH /schedule — replace the title of a schedule the caller owns.
pub async fn edit_schedule(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
    body: Bytes,
) -> ApiResult {
    const FAILED: &str = "Failed to update schedule";

    let query = query_params(query)?;
    let email = required_email(&query)?;
    let id = required_id(&query)?;
    let (schedule, user) = owned_schedule(&state, &email, id, FAILED)?;

    let req: EditBody = parse_body(&body)?;
    if req.title.is_empty() {
        return Err(ApiError::BadRequest("Title is required"));
    }

    let updated = state
        .schedules
        .update_title(schedule.id, user.id, &req.title)
        .map_err(|e| schedule_error(e, FAILED))?;
    Ok(success(StatusCode::CREATED, updated))
}

/// DELETE /schedule — permanently remove a schedule the caller owns.
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> ApiResult {
    const FAILED: &str = "Failed to delete schedule";

    let query = query_params(query)?;
    let email = required_email(&query)?;
    let id = required_id(&query)?;
    let (schedule, user) = owned_schedule(&state, &email, id, FAILED)?;

    state
        .schedules
        .delete(schedule.id, user.id)
        .map_err(|e| schedule_error(e, FAILED))?;
    Ok(success(StatusCode::OK, json!({})))
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn query_params(
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<ScheduleQuery, ApiError> {
    query
        .map(|Query(q)| q)
        .map_err(|_| ApiError::BadRequest("Invalid query string"))
}

fn required_email(query: &ScheduleQuery) -> Result<Email, ApiError> {
    Ok(Email::parse(query.email.as_deref().unwrap_or_default())?)
}

/// Schedule ids are plain decimal digits that fit in an `i64`. Signs are
/// rejected too.
fn required_id(query: &ScheduleQuery) -> Result<i64, ApiError> {
    let raw = query.id.as_deref().unwrap_or_default();
    if raw.is_empty() {
        return Err(ApiError::BadRequest("ID is required"));
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest("Invalid ID"));
    }
    raw.parse::<u64>()
        .ok()
        .and_then(|id| i64::try_from(id).ok())
        .ok_or(ApiError::BadRequest("Invalid ID"))
}

fn parse_day(raw: &str) -> Result<Day, ApiError> {
    raw.parse::<Day>()
        .map_err(|_| ApiError::BadRequest("Day is invalid"))
}

fn resolve_user(state: &AppState, email: &Email, failed: &'static str) -> Result<User, ApiError> {
    state.users.require(email).map_err(|e| match e {
        UserError::NotFound(_) => ApiError::email_not_found(),
        other => ApiError::internal(failed, other),
    })
}

/// Shared edit/delete preamble: the schedule must exist (404 naming the id),
/// the email must be known (404), and the schedule must belong to that user
/// (403). Checked in that order.
fn owned_schedule(
    state: &AppState,
    email: &Email,
    id: i64,
    failed: &'static str,
) -> Result<(Schedule, User), ApiError> {
    let schedule = state
        .schedules
        .get(id)
        .map_err(|e| ApiError::internal(failed, e))?
        .ok_or_else(|| schedule_not_found(id))?;

    let user = resolve_user(state, email, failed)?;
    if !schedule.is_owned_by(user.id) {
        return Err(ApiError::Forbidden);
    }
    Ok((schedule, user))
}

/// A NotFound here means the row vanished between the ownership check and
/// the write (a concurrent delete).
fn schedule_error(err: ScheduleError, failed: &'static str) -> ApiError {
    match err {
        ScheduleError::NotFound { id } => schedule_not_found(id),
        other => ApiError::internal(failed, other),
    }
}

fn schedule_not_found(id: i64) -> ApiError {
    ApiError::NotFound(ScheduleError::NotFound { id }.to_string())
}

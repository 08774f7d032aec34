use serde::{Deserialize, Serialize};

/// A user as stored in the `users` table and as held by the directory.
///
/// The snapshot deliberately carries no schedules: those are always read
/// from the store so a cached user can never show a stale schedule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned, monotonically increasing.
    pub id: i64,
    pub email: String,
    // RFC 3339 timestamps.
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

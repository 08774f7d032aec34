use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::{row_to_user, USER_COLUMNS};
use crate::error::{Result, UserError};
use crate::types::User;

/// Insert a user for `email` unless one already exists, then read the row
/// back. Returns the stored user and whether this call created it.
///
/// INSERT OR IGNORE against the UNIQUE email column means two callers racing
/// on the same email still end up with a single row. The caller must hold
/// the connection for both statements so the read-back sees its own insert.
pub fn insert_if_absent(conn: &Connection, email: &str) -> Result<(User, bool)> {
    let now = Utc::now().to_rfc3339();
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO users (email, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![email, now],
    )?;
    let user = find_user_by_email(conn, email)?
        .ok_or_else(|| UserError::NotFound(email.to_string()))?;
    Ok((user, inserted == 1))
}

/// Load a user by email. Returns None instead of an error when absent so
/// callers decide whether missing is exceptional in their context.
pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
    let user = conn
        .query_row(&sql, params![email], row_to_user)
        .optional()?;
    Ok(user)
}

/// Every stored user, oldest first. Used once at startup to warm the directory.
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let users = stmt
        .query_map([], row_to_user)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(users)
}

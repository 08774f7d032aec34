use rusqlite::{Connection, Result};

use crate::types::User;

/// Column list shared by every user SELECT so `row_to_user` indexes stay valid.
pub(crate) const USER_COLUMNS: &str = "id, email, created_at, updated_at";

/// Map a SELECT row (column order from USER_COLUMNS) to a User.
pub(crate) fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

/// Create the users table. Safe to call on every startup: CREATE IF NOT
/// EXISTS, no versioned migrations.
///
/// Must run before the schedules table is created, which references it.
pub fn init_db(conn: &Connection) -> Result<()> {
    // UNIQUE(email) is what makes check-in's insert-if-absent atomic.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            email       TEXT NOT NULL UNIQUE,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_db_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        init_db(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn email_column_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        let insert = "INSERT INTO users (email, created_at, updated_at) VALUES ('a@b.com', 'x', 'x')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }
}

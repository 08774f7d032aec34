use rusqlite::Connection;

use crate::error::Result;

/// Initialise the schedules table and its index.
///
/// Safe to call on every startup: uses `IF NOT EXISTS` throughout. The users
/// table must already exist because `user_id` references it.
pub fn init_db(conn: &Connection) -> Result<()> {
    // The CHECK mirrors `Day`; the handlers validate first, this is the backstop.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schedules (
            schedule_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL REFERENCES users(id),
            title       TEXT NOT NULL,
            day         TEXT NOT NULL CHECK (day IN (
                            'monday', 'tuesday', 'wednesday', 'thursday',
                            'friday', 'saturday', 'sunday')),
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_schedules_user
            ON schedules(user_id, schedule_id);",
    )?;
    Ok(())
}

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;
use weekplan_core::config::DatabaseConfig;

/// Open the SQLite store and sync the schema (create-if-missing).
///
/// One connection serves the whole process: the user directory and the
/// schedule manager share it so check-in's insert-and-read-back and every
/// schedule write are serialised by the same lock.
pub fn open_store(config: &DatabaseConfig) -> anyhow::Result<Arc<Mutex<Connection>>> {
    if !config.is_in_memory() {
        ensure_parent_dir(&config.path);
    }
    info!(path = %config.path, "opening SQLite database");

    let conn = Connection::open(&config.path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    // users first: schedules.user_id references it
    weekplan_users::db::init_db(&conn)?;
    weekplan_schedules::db::init_db(&conn)?;
    info!("database schema ready");

    Ok(Arc::new(Mutex::new(conn)))
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}

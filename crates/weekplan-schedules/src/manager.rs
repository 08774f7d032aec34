use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, instrument};
use weekplan_core::Day;

use crate::error::{Result, ScheduleError};
use crate::types::{Schedule, WeekSchedules};

const SCHEDULE_COLUMNS: &str = "schedule_id, user_id, title, day, created_at, updated_at";

/// Store access for schedules.
///
/// Shares the users' SQLite connection (`Arc<Mutex<_>>`) so the foreign key
/// to `users` resolves against the same database, in-memory ones included.
/// Each method holds the lock for its whole duration.
pub struct ScheduleManager {
    db: Arc<Mutex<Connection>>,
}

impl ScheduleManager {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    /// Insert a schedule for `user_id`. The caller has already checked the
    /// user exists; the foreign key rejects it otherwise.
    #[instrument(skip(self, title))]
    pub fn create(&self, user_id: i64, title: &str, day: Day) -> Result<Schedule> {
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.conn()?;
        db.execute(
            "INSERT INTO schedules (user_id, title, day, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![user_id, title, day.as_str(), now],
        )?;
        let schedule = Schedule {
            id: db.last_insert_rowid(),
            user_id,
            title: title.to_string(),
            day,
            created_at: now.clone(),
            updated_at: now,
        };
        debug!(schedule_id = schedule.id, "schedule created");
        Ok(schedule)
    }

    /// Retrieve a schedule by id, returning `None` if it does not exist.
    #[instrument(skip(self))]
    pub fn get(&self, id: i64) -> Result<Option<Schedule>> {
        let db = self.conn()?;
        fetch(&db, id)
    }

    /// All of a user's schedules in insertion order.
    #[instrument(skip(self))]
    pub fn list_for_user(&self, user_id: i64) -> Result<Vec<Schedule>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules
             WHERE user_id = ?1
             ORDER BY schedule_id ASC"
        ))?;
        let rows = stmt
            .query_map(params![user_id], row_to_schedule)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// A user's schedules on one day, in insertion order.
    #[instrument(skip(self))]
    pub fn list_for_user_on(&self, user_id: i64, day: Day) -> Result<Vec<Schedule>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules
             WHERE user_id = ?1 AND day = ?2
             ORDER BY schedule_id ASC"
        ))?;
        let rows = stmt
            .query_map(params![user_id, day.as_str()], row_to_schedule)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// A user's schedules bucketed into all seven days.
    pub fn week_for_user(&self, user_id: i64) -> Result<WeekSchedules> {
        Ok(WeekSchedules::from_schedules(self.list_for_user(user_id)?))
    }

    /// Replace the title of a schedule owned by `owner_id` and bump
    /// `updated_at`. Day and owner never change.
    ///
    /// Returns `NotFound` when no row matches both id and owner.
    #[instrument(skip(self, title))]
    pub fn update_title(&self, id: i64, owner_id: i64, title: &str) -> Result<Schedule> {
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.conn()?;
        let rows_changed = db.execute(
            "UPDATE schedules SET title = ?1, updated_at = ?2
             WHERE schedule_id = ?3 AND user_id = ?4",
            params![title, now, id, owner_id],
        )?;
        if rows_changed == 0 {
            return Err(ScheduleError::NotFound { id });
        }
        fetch(&db, id)?.ok_or(ScheduleError::NotFound { id })
    }

    /// Permanently delete a schedule owned by `owner_id`.
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64, owner_id: i64) -> Result<()> {
        let db = self.conn()?;
        let rows_changed = db.execute(
            "DELETE FROM schedules WHERE schedule_id = ?1 AND user_id = ?2",
            params![id, owner_id],
        )?;
        if rows_changed == 0 {
            return Err(ScheduleError::NotFound { id });
        }
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| ScheduleError::LockPoisoned)
    }
}

fn fetch(db: &Connection, id: i64) -> Result<Option<Schedule>> {
    let schedule = db
        .query_row(
            &format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE schedule_id = ?1"),
            params![id],
            row_to_schedule,
        )
        .optional()?;
    Ok(schedule)
}

/// Map a SQLite row (column order from SCHEDULE_COLUMNS) to a `Schedule`.
fn row_to_schedule(row: &rusqlite::Row<'_>) -> rusqlite::Result<Schedule> {
    let day = row.get::<_, String>(3)?.parse::<Day>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Schedule {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        day,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        db: Arc<Mutex<Connection>>,
        schedules: ScheduleManager,
    }

    impl Fixture {
        fn new() -> Self {
            let conn = Connection::open_in_memory().unwrap();
            conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
            weekplan_users::db::init_db(&conn).unwrap();
            crate::db::init_db(&conn).unwrap();
            let db = Arc::new(Mutex::new(conn));
            Self {
                schedules: ScheduleManager::new(db.clone()),
                db,
            }
        }

        fn user(&self, email: &str) -> i64 {
            let conn = self.db.lock().unwrap();
            weekplan_users::store::insert_if_absent(&conn, email).unwrap().0.id
        }
    }

    #[test]
    fn create_then_get() {
        let fx = Fixture::new();
        let uid = fx.user("a@b.com");
        let created = fx.schedules.create(uid, "Gym", Day::Monday).unwrap();
        assert_eq!(created.user_id, uid);
        assert_eq!(created.day, Day::Monday);
        assert_eq!(fx.schedules.get(created.id).unwrap(), Some(created));
    }

    #[test]
    fn get_missing_is_none() {
        let fx = Fixture::new();
        assert_eq!(fx.schedules.get(42).unwrap(), None);
    }

    #[test]
    fn create_for_unknown_user_is_rejected() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.schedules.create(999, "Gym", Day::Monday),
            Err(ScheduleError::Database(_))
        ));
    }

    #[test]
    fn store_rejects_non_canonical_day() {
        let fx = Fixture::new();
        let uid = fx.user("a@b.com");
        let conn = fx.db.lock().unwrap();
        let res = conn.execute(
            "INSERT INTO schedules (user_id, title, day, created_at, updated_at)
             VALUES (?1, 'x', 'Funday', 'now', 'now')",
            params![uid],
        );
        assert!(res.is_err());
    }

    #[test]
    fn lists_are_scoped_to_user_and_ordered() {
        let fx = Fixture::new();
        let a = fx.user("a@b.com");
        let b = fx.user("c@d.com");
        fx.schedules.create(a, "Gym", Day::Monday).unwrap();
        fx.schedules.create(b, "Swim", Day::Monday).unwrap();
        fx.schedules.create(a, "Read", Day::Friday).unwrap();
        fx.schedules.create(a, "Cook", Day::Monday).unwrap();

        let titles: Vec<_> = fx
            .schedules
            .list_for_user(a)
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Gym", "Read", "Cook"]);

        let monday = fx.schedules.list_for_user_on(a, Day::Monday).unwrap();
        assert_eq!(monday.len(), 2);
        assert!(fx.schedules.list_for_user_on(a, Day::Sunday).unwrap().is_empty());
    }

    #[test]
    fn week_total_matches_schedule_count() {
        let fx = Fixture::new();
        let uid = fx.user("a@b.com");
        for (i, day) in Day::ALL.into_iter().enumerate() {
            for n in 0..=i {
                fx.schedules.create(uid, &format!("{day}-{n}"), day).unwrap();
            }
        }
        let week = fx.schedules.week_for_user(uid).unwrap();
        assert_eq!(week.total(), fx.schedules.list_for_user(uid).unwrap().len());
        assert_eq!(week.day(Day::Sunday).len(), 7);
    }

    #[test]
    fn update_title_keeps_day_and_owner() {
        let fx = Fixture::new();
        let uid = fx.user("a@b.com");
        let created = fx.schedules.create(uid, "Gym", Day::Wednesday).unwrap();
        let stale = "2000-01-01T00:00:00+00:00";
        fx.db
            .lock()
            .unwrap()
            .execute(
                "UPDATE schedules SET updated_at = ?1 WHERE schedule_id = ?2",
                params![stale, created.id],
            )
            .unwrap();

        let updated = fx.schedules.update_title(created.id, uid, "Run").unwrap();
        assert_eq!(updated.title, "Run");
        assert_eq!(updated.day, Day::Wednesday);
        assert_eq!(updated.user_id, uid);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.as_str() > stale);
    }

    #[test]
    fn update_and_delete_require_owner() {
        let fx = Fixture::new();
        let owner = fx.user("a@b.com");
        let other = fx.user("c@d.com");
        let s = fx.schedules.create(owner, "Gym", Day::Monday).unwrap();

        assert!(matches!(
            fx.schedules.update_title(s.id, other, "Hacked"),
            Err(ScheduleError::NotFound { id }) if id == s.id
        ));
        assert!(matches!(
            fx.schedules.delete(s.id, other),
            Err(ScheduleError::NotFound { .. })
        ));
        assert_eq!(fx.schedules.get(s.id).unwrap().unwrap().title, "Gym");
    }

    #[test]
    fn delete_removes_row() {
        let fx = Fixture::new();
        let uid = fx.user("a@b.com");
        let s = fx.schedules.create(uid, "Gym", Day::Monday).unwrap();
        fx.schedules.delete(s.id, uid).unwrap();
        assert_eq!(fx.schedules.get(s.id).unwrap(), None);
        assert!(matches!(
            fx.schedules.delete(s.id, uid),
            Err(ScheduleError::NotFound { .. })
        ));
    }

    #[test]
    fn not_found_message_names_the_id() {
        let err = ScheduleError::NotFound { id: 17 };
        assert_eq!(err.to_string(), "Schedule with ID 17 Not Found");
    }
}

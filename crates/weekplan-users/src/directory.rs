use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use rusqlite::Connection;
use tracing::{debug, info, instrument};
use weekplan_core::Email;

use crate::error::{Result, UserError};
use crate::store::{find_user_by_email, insert_if_absent, list_users};
use crate::types::User;

/// Outcome of a check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIn {
    /// The email was already known (cache or store).
    Existing(User),
    /// First check-in for this email; a row was inserted.
    Created(User),
}

impl CheckIn {
    pub fn user(&self) -> &User {
        match self {
            CheckIn::Existing(u) | CheckIn::Created(u) => u,
        }
    }

    pub fn into_user(self) -> User {
        match self {
            CheckIn::Existing(u) | CheckIn::Created(u) => u,
        }
    }
}

/// Process-wide email → user directory in front of the users table.
///
/// A read-through cache of user identity, nothing more: the store stays the
/// only source of truth and schedules are never cached here.
///
/// Contracts:
/// - reads (`cached`, `resolve`) hand out cloned snapshots;
/// - writes go through the `DashMap` entry API, so when two tasks race to
///   cache the same email the first insert wins and both observe it;
/// - entries are never evicted and never go stale, because a user row is
///   immutable once created.
pub struct UserDirectory {
    db: Arc<Mutex<Connection>>,
    cache: DashMap<String, User>,
}

impl UserDirectory {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self {
            db,
            cache: DashMap::new(),
        }
    }

    /// Load every stored user into the cache. Called once at startup, after
    /// the schema exists. Returns how many users were loaded.
    #[instrument(skip(self))]
    pub fn warm(&self) -> Result<usize> {
        let users = {
            let conn = self.conn()?;
            list_users(&conn)?
        };
        let count = users.len();
        for user in users {
            self.cache.insert(user.email.clone(), user);
        }
        info!(count, "user directory warmed");
        Ok(count)
    }

    /// Create-or-retrieve the user for `email`.
    ///
    /// Cache hit: answered without touching the store. Miss: atomic
    /// insert-if-absent under the store lock, then cached.
    #[instrument(skip(self), fields(email = %email))]
    pub fn check_in(&self, email: &Email) -> Result<CheckIn> {
        if let Some(user) = self.cached(email) {
            debug!(user_id = user.id, "cache hit");
            return Ok(CheckIn::Existing(user));
        }

        let (user, created) = {
            let conn = self.conn()?;
            insert_if_absent(&conn, email.as_str())?
        };
        let user = self.remember(user);
        if created {
            info!(user_id = user.id, "new user checked in");
            Ok(CheckIn::Created(user))
        } else {
            Ok(CheckIn::Existing(user))
        }
    }

    /// Look a user up by email: cache first, then the store. A store hit is
    /// cached before returning.
    #[instrument(skip(self), fields(email = %email))]
    pub fn resolve(&self, email: &Email) -> Result<Option<User>> {
        if let Some(user) = self.cached(email) {
            debug!(user_id = user.id, "cache hit");
            return Ok(Some(user));
        }

        let found = {
            let conn = self.conn()?;
            find_user_by_email(&conn, email.as_str())?
        };
        Ok(found.map(|user| {
            debug!(user_id = user.id, "cache miss; loaded from store");
            self.remember(user)
        }))
    }

    /// Like `resolve`, but an unknown email is an error.
    pub fn require(&self, email: &Email) -> Result<User> {
        self.resolve(email)?
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }

    /// Cache-only peek; never touches the store.
    pub fn cached(&self, email: &Email) -> Option<User> {
        self.cache.get(email.as_str()).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    /// Cache `user` unless an entry already exists; return whichever is cached.
    fn remember(&self, user: User) -> User {
        self.cache
            .entry(user.email.clone())
            .or_insert(user)
            .value()
            .clone()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| UserError::LockPoisoned)
    }
}

//! Punch-in record store.
//!
//! One [`PunchInStore`] is opened at startup and cloned into whoever needs
//! it. All handles share a single SQLite connection behind a mutex, so
//! writes are serialized. Every successful write bumps a revision counter
//! on a `watch` channel; [`RecordFeed`] uses it to re-query a user's list
//! whenever the table changes.

use crate::db::initialize::init_db;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{
    count_punch_ins_per_user, delete_punch_ins_by_user, insert_punch_in, load_punch_ins_by_user,
};
use crate::errors::{AppError, AppResult};
use crate::models::punch_in::{NewPunchIn, PunchIn};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::watch;

struct Inner {
    pool: Mutex<DbPool>,
    revision: watch::Sender<u64>,
}

#[derive(Clone)]
pub struct PunchInStore {
    inner: Arc<Inner>,
}

impl PunchInStore {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        Ok(Self::from_pool(pool))
    }

    pub fn in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        init_db(&pool.conn)?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an already-migrated connection.
    pub fn from_pool(pool: DbPool) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                pool: Mutex::new(pool),
                revision,
            }),
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, DbPool>> {
        lock_pool(&self.inner)
    }

    /// Run `func` against the shared connection.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let pool = self.lock()?;
        func(&pool.conn)
    }

    fn notify(&self) {
        self.inner.revision.send_modify(|rev| *rev += 1);
    }

    /// Append one sample. The returned record carries the assigned id.
    pub fn insert(&self, punch_in: &NewPunchIn) -> AppResult<PunchIn> {
        let record = {
            let pool = self.lock()?;
            let record = insert_punch_in(&pool.conn, punch_in)?;
            audit(
                &pool.conn,
                "punch_in",
                &record.user_id,
                &format!(
                    "#{} at {:.6},{:.6}",
                    record.id, record.latitude, record.longitude
                ),
            );
            record
        };
        self.notify();
        Ok(record)
    }

    /// Snapshot of a user's records, newest first.
    pub fn list_by_user(&self, user_id: &str) -> AppResult<Vec<PunchIn>> {
        let pool = self.lock()?;
        load_punch_ins_by_user(&pool.conn, user_id)
    }

    /// Live view of a user's records. See [`RecordFeed::next`].
    pub fn subscribe(&self, user_id: &str) -> RecordFeed {
        RecordFeed {
            store: Arc::downgrade(&self.inner),
            changes: self.inner.revision.subscribe(),
            user_id: user_id.to_string(),
            primed: false,
        }
    }

    /// Remove every record of `user_id`. Returns the number of rows removed.
    pub fn delete_all_by_user(&self, user_id: &str) -> AppResult<usize> {
        let removed = {
            let pool = self.lock()?;
            let removed = delete_punch_ins_by_user(&pool.conn, user_id)?;
            if removed > 0 {
                audit(
                    &pool.conn,
                    "clear",
                    user_id,
                    &format!("Deleted {} punch-in(s)", removed),
                );
            }
            removed
        };
        if removed > 0 {
            self.notify();
        }
        Ok(removed)
    }

    pub fn count_by_user(&self) -> AppResult<Vec<(String, i64)>> {
        let pool = self.lock()?;
        count_punch_ins_per_user(&pool.conn)
    }
}

fn lock_pool(inner: &Inner) -> AppResult<MutexGuard<'_, DbPool>> {
    inner
        .pool
        .lock()
        .map_err(|_| AppError::Other("punch-in store lock poisoned".into()))
}

/// Push-on-change view of one user's records.
///
/// The feed does not keep the store alive: once every [`PunchInStore`]
/// handle is dropped, [`RecordFeed::next`] returns `None`.
pub struct RecordFeed {
    store: Weak<Inner>,
    changes: watch::Receiver<u64>,
    user_id: String,
    primed: bool,
}

impl RecordFeed {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The first call yields the current list immediately. Later calls wait
    /// for the next insert or delete and yield the refreshed list. Several
    /// writes between two calls collapse into a single refresh.
    pub async fn next(&mut self) -> Option<AppResult<Vec<PunchIn>>> {
        if self.primed {
            self.changes.changed().await.ok()?;
        } else {
            self.primed = true;
        }
        self.changes.borrow_and_update();

        let inner = self.store.upgrade()?;
        let result = lock_pool(&inner)
            .and_then(|pool| load_punch_ins_by_user(&pool.conn, &self.user_id));
        Some(result)
    }
}

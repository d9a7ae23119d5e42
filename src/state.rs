use chrono::Local;
use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::db::MeetingDb;
use crate::devtools::seed_demo_data;
use crate::error::StoreError;
use crate::latency::LatencyRecorder;

/// Shared application state, handed to every request as `Arc<AppState>`.
///
/// The store sits behind a single lock. A request takes it once, does all of its
/// reads and writes, and drops it before responding. Never hold the guard across
/// an `.await`.
pub struct AppState {
    db: Mutex<MeetingDb>,
    pub latency: LatencyRecorder,
    pub config: Config,
}

impl AppState {
    /// Fresh store, seeded with demo data when `config.seed_demo_data` is set.
    pub fn new(config: Config) -> Result<Self, StoreError> {
        let mut db = MeetingDb::new();
        if config.seed_demo_data {
            seed_demo_data(&mut db, &Local::now())?;
        } else {
            log::info!("Demo data disabled; starting with an empty store");
        }
        Ok(Self::from_parts(db, config))
    }

    /// Wrap an existing store. Used by tests to pin exact contents.
    pub fn with_db(db: MeetingDb) -> Self {
        Self::from_parts(db, Config::default())
    }

    fn from_parts(db: MeetingDb, config: Config) -> Self {
        Self {
            db: Mutex::new(db),
            latency: LatencyRecorder::default(),
            config,
        }
    }

    /// Lock the store for one unit of work.
    pub fn db(&self) -> MutexGuard<'_, MeetingDb> {
        self.db.lock()
    }

    /// Run `f` against the store under the lock.
    pub fn with_db_read<T>(&self, f: impl FnOnce(&MeetingDb) -> T) -> T {
        f(&*self.db.lock())
    }

    pub fn with_db_write<T>(&self, f: impl FnOnce(&mut MeetingDb) -> T) -> T {
        f(&mut *self.db.lock())
    }
}

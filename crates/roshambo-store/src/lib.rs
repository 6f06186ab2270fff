//! Flat-file persistence for match records and user accounts.

mod memory;
mod per_user;
mod single;
mod users;
mod workbook;

pub use memory::MemoryStore;
pub use per_user::PerUserStore;
pub use single::SingleWorkbookStore;
pub use users::UserStore;

use roshambo_types::{
    config::{StoreConfig, StoreLayout},
    record::{AggregateStats, MatchRecord},
    Result, RoshamboError,
};

/// Everything persisted for one player (or for the whole file when unscoped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRecord {
    pub stats: AggregateStats,
    pub history: Vec<MatchRecord>,
    /// False when neither a stats row nor a history row was found.
    pub exists: bool,
}

/// Durable backing copy of the engine state.
///
/// `save_all` always replaces the full state for the given scope; there is no
/// incremental append.
pub trait RecordStore {
    /// Whether `load`/`save_all` must be called with a username.
    fn requires_user(&self) -> bool;
    fn load(&self, user: Option<&str>) -> Result<StoredRecord>;
    fn save_all(
        &mut self,
        user: Option<&str>,
        stats: &AggregateStats,
        history: &[MatchRecord],
    ) -> Result<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn requires_user(&self) -> bool {
        (**self).requires_user()
    }

    fn load(&self, user: Option<&str>) -> Result<StoredRecord> {
        (**self).load(user)
    }

    fn save_all(
        &mut self,
        user: Option<&str>,
        stats: &AggregateStats,
        history: &[MatchRecord],
    ) -> Result<()> {
        (**self).save_all(user, stats, history)
    }
}

/// Builds the record store selected by `config.layout`.
pub fn open_record_store(config: &StoreConfig) -> Box<dyn RecordStore> {
    match config.layout {
        StoreLayout::PerUser => Box::new(PerUserStore::new(
            config.stats_path(),
            config.history_path(),
        )),
        StoreLayout::Single => Box::new(SingleWorkbookStore::new(config.workbook_path())),
    }
}

pub fn store_error(message: impl Into<String>) -> RoshamboError {
    RoshamboError::Store(message.into())
}

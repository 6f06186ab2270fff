use std::collections::HashMap;

use roshambo_types::{
    record::{AggregateStats, MatchRecord},
    Result,
};

use crate::{store_error, RecordStore, StoredRecord};

/// Non-durable store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    scoped: bool,
    records: HashMap<Option<String>, (AggregateStats, Vec<MatchRecord>)>,
    saves: usize,
    fail_writes: bool,
}

impl MemoryStore {
    /// A store keyed by username, like the per-user workbooks.
    pub fn scoped() -> Self {
        Self {
            scoped: true,
            ..Self::default()
        }
    }

    /// A store holding a single anonymous record.
    pub fn unscoped() -> Self {
        Self::default()
    }

    /// Makes every subsequent `save_all` fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl RecordStore for MemoryStore {
    fn requires_user(&self) -> bool {
        self.scoped
    }

    fn load(&self, user: Option<&str>) -> Result<StoredRecord> {
        let key = user.filter(|_| self.scoped).map(str::to_string);
        Ok(match self.records.get(&key) {
            Some((stats, history)) => StoredRecord {
                stats: *stats,
                history: history.clone(),
                exists: true,
            },
            None => StoredRecord::default(),
        })
    }

    fn save_all(
        &mut self,
        user: Option<&str>,
        stats: &AggregateStats,
        history: &[MatchRecord],
    ) -> Result<()> {
        if self.fail_writes {
            return Err(store_error("memory store is read-only"));
        }
        if self.scoped && user.is_none() {
            return Err(store_error("scoped memory store needs an active username"));
        }
        let key = user.filter(|_| self.scoped).map(str::to_string);
        self.records.insert(key, (*stats, history.to_vec()));
        self.saves += 1;
        Ok(())
    }
}

use std::path::PathBuf;

use roshambo_types::{
    record::{AggregateStats, MatchRecord},
    Result,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    workbook::{read_workbook, write_workbook},
    RecordStore, StoredRecord,
};

/// Sheets "History" and "Stats", no username column.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Workbook {
    #[serde(rename = "History", default)]
    history: Vec<MatchRecord>,
    #[serde(rename = "Stats", default)]
    stats: Vec<AggregateStats>,
}

/// One workbook holding the single local player's data.
pub struct SingleWorkbookStore {
    path: PathBuf,
}

impl SingleWorkbookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordStore for SingleWorkbookStore {
    fn requires_user(&self) -> bool {
        false
    }

    fn load(&self, user: Option<&str>) -> Result<StoredRecord> {
        if let Some(user) = user {
            warn!("Single workbook ignores username '{}'", user);
        }
        let book: Workbook = read_workbook(&self.path)?;
        let exists = !book.stats.is_empty() || !book.history.is_empty();
        info!("Loaded {} rounds from {:?}", book.history.len(), self.path);
        Ok(StoredRecord {
            stats: book.stats.first().copied().unwrap_or_default(),
            history: book.history,
            exists,
        })
    }

    fn save_all(
        &mut self,
        _user: Option<&str>,
        stats: &AggregateStats,
        history: &[MatchRecord],
    ) -> Result<()> {
        let book = Workbook {
            history: history.to_vec(),
            stats: vec![*stats],
        };
        write_workbook(&self.path, &book)?;
        info!("Saved {} rounds to {:?}", history.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::testing::scratch_dir;
    use roshambo_types::moves::Move;
    use std::fs;

    #[test]
    fn round_trip_preserves_order() {
        let dir = scratch_dir("single-roundtrip");
        let mut store = SingleWorkbookStore::new(dir.join("rps_data.json"));
        assert!(!store.load(None).expect("load empty").exists);

        let history = vec![
            MatchRecord::new("2024-06-01 08:00:00", Move::Scissors, Move::Rock),
            MatchRecord::new("2024-06-01 08:00:02", Move::Rock, Move::Scissors),
        ];
        let stats = AggregateStats::from_history(&history);
        store.save_all(None, &stats, &history).expect("save");

        let loaded = store.load(None).expect("load");
        assert!(loaded.exists);
        assert_eq!(loaded.stats, stats);
        assert_eq!(loaded.history, history);

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("rps_data.json")).expect("read"))
                .expect("parse");
        assert!(doc["History"][0].get("username").is_none());
        assert_eq!(doc["Stats"][0]["total_games"], 2);
        fs::remove_dir_all(&dir).expect("cleanup");
    }
}

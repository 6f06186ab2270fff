use std::path::PathBuf;

use roshambo_types::{
    record::{AggregateStats, MatchRecord},
    Result,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    store_error,
    workbook::{read_workbook, write_workbook},
    RecordStore, StoredRecord,
};

/// Columns: username, total_games, wins, rock, paper, scissors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StatsRow {
    username: String,
    #[serde(flatten)]
    stats: AggregateStats,
}

/// Columns: username, datetime, player, computer, result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HistoryRow {
    username: String,
    #[serde(flatten)]
    record: MatchRecord,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StatsBook {
    #[serde(rename = "Stats", default)]
    rows: Vec<StatsRow>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryBook {
    #[serde(rename = "History", default)]
    rows: Vec<HistoryRow>,
}

/// Two workbooks shared by every registered user, filtered by username.
pub struct PerUserStore {
    stats_path: PathBuf,
    history_path: PathBuf,
}

impl PerUserStore {
    pub fn new(stats_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        Self {
            stats_path: stats_path.into(),
            history_path: history_path.into(),
        }
    }
}

fn require_user(user: Option<&str>) -> Result<&str> {
    user.ok_or_else(|| store_error("per-user store needs an active username"))
}

impl RecordStore for PerUserStore {
    fn requires_user(&self) -> bool {
        true
    }

    fn load(&self, user: Option<&str>) -> Result<StoredRecord> {
        let username = require_user(user)?;
        let stats_book: StatsBook = read_workbook(&self.stats_path)?;
        let history_book: HistoryBook = read_workbook(&self.history_path)?;

        let stats_row = stats_book.rows.into_iter().find(|row| row.username == username);
        let history: Vec<MatchRecord> = history_book
            .rows
            .into_iter()
            .filter(|row| row.username == username)
            .map(|row| row.record)
            .collect();

        let exists = stats_row.is_some() || !history.is_empty();
        info!(
            "Loaded {} rounds for '{}' (stats row present: {})",
            history.len(),
            username,
            stats_row.is_some()
        );
        Ok(StoredRecord {
            stats: stats_row.map(|row| row.stats).unwrap_or_default(),
            history,
            exists,
        })
    }

    fn save_all(
        &mut self,
        user: Option<&str>,
        stats: &AggregateStats,
        history: &[MatchRecord],
    ) -> Result<()> {
        let username = require_user(user)?;

        let mut stats_book: StatsBook = read_workbook(&self.stats_path)?;
        let row = StatsRow {
            username: username.to_string(),
            stats: *stats,
        };
        match stats_book.rows.iter_mut().find(|r| r.username == username) {
            Some(existing) => *existing = row,
            None => stats_book.rows.push(row),
        }

        let mut history_book: HistoryBook = read_workbook(&self.history_path)?;
        history_book.rows.retain(|r| r.username != username);
        history_book
            .rows
            .extend(history.iter().cloned().map(|record| HistoryRow {
                username: username.to_string(),
                record,
            }));

        write_workbook(&self.stats_path, &stats_book)?;
        write_workbook(&self.history_path, &history_book)?;
        info!("Saved {} rounds for '{}'", history.len(), username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::testing::scratch_dir;
    use roshambo_types::moves::Move;
    use std::fs;

    fn sample_history() -> Vec<MatchRecord> {
        vec![
            MatchRecord::new("2024-05-01 12:00:00", Move::Rock, Move::Scissors),
            MatchRecord::new("2024-05-01 12:00:03", Move::Paper, Move::Scissors),
            MatchRecord::new("2024-05-01 12:00:07", Move::Paper, Move::Paper),
        ]
    }

    #[test]
    fn unknown_user_loads_empty() {
        let dir = scratch_dir("per-user-empty");
        let store = PerUserStore::new(dir.join("stats.json"), dir.join("history.json"));
        let loaded = store.load(Some("nobody")).expect("load");
        assert!(!loaded.exists);
        assert_eq!(loaded.stats, AggregateStats::default());
        assert!(loaded.history.is_empty());
        assert!(store.load(None).is_err());
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = scratch_dir("per-user-roundtrip");
        let mut store = PerUserStore::new(dir.join("stats.json"), dir.join("history.json"));
        let history = sample_history();
        let stats = AggregateStats::from_history(&history);
        store.save_all(Some("alice"), &stats, &history).expect("save");

        let loaded = store.load(Some("alice")).expect("load");
        assert!(loaded.exists);
        assert_eq!(loaded.stats, stats);
        assert_eq!(loaded.history, history);
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn saving_one_user_keeps_the_others() {
        let dir = scratch_dir("per-user-isolation");
        let mut store = PerUserStore::new(dir.join("stats.json"), dir.join("history.json"));
        let history = sample_history();
        let stats = AggregateStats::from_history(&history);
        store.save_all(Some("alice"), &stats, &history).expect("save alice");
        store
            .save_all(Some("bob"), &AggregateStats::default(), &[])
            .expect("save bob");

        let shorter = &history[..1];
        store
            .save_all(Some("alice"), &AggregateStats::from_history(shorter), shorter)
            .expect("overwrite alice");

        let alice = store.load(Some("alice")).expect("load alice");
        assert_eq!(alice.history.len(), 1);
        assert_eq!(alice.stats.total_games, 1);
        let bob = store.load(Some("bob")).expect("load bob");
        assert!(bob.exists);
        assert_eq!(bob.stats.total_games, 0);
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn rows_use_legacy_column_names() {
        let dir = scratch_dir("per-user-columns");
        let mut store = PerUserStore::new(dir.join("stats.json"), dir.join("history.json"));
        let history = sample_history();
        store
            .save_all(Some("alice"), &AggregateStats::from_history(&history), &history)
            .expect("save");

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("history.json")).expect("read"))
                .expect("parse");
        let first = &doc["History"][0];
        assert_eq!(first["username"], "alice");
        assert_eq!(first["player"], "rock");
        assert_eq!(first["computer"], "scissors");
        assert_eq!(first["result"], "wins");

        let stats: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("stats.json")).expect("read"))
                .expect("parse");
        assert_eq!(stats["Stats"][0]["paper"], 2);
        fs::remove_dir_all(&dir).expect("cleanup");
    }
}

use serde::{Deserialize, Serialize};

use crate::moves::{Move, Outcome};

/// One resolved round. Never mutated once appended to a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub datetime: String,
    pub player: Move,
    pub computer: Move,
    pub result: Outcome,
}

impl MatchRecord {
    pub fn new(datetime: impl Into<String>, player: Move, computer: Move) -> Self {
        Self {
            datetime: datetime.into(),
            player,
            computer,
            result: player.against(computer),
        }
    }

    /// Single-line rendering used by the history view.
    pub fn describe(&self) -> String {
        format!(
            "{} - Player: {} vs Computer: {} - {}",
            self.datetime,
            self.player.display_name(),
            self.computer.display_name(),
            self.result.label()
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCounts {
    pub rock: u32,
    pub paper: u32,
    pub scissors: u32,
}

impl MoveCounts {
    pub fn get(&self, mv: Move) -> u32 {
        match mv {
            Move::Rock => self.rock,
            Move::Paper => self.paper,
            Move::Scissors => self.scissors,
        }
    }

    pub fn increment(&mut self, mv: Move) {
        match mv {
            Move::Rock => self.rock += 1,
            Move::Paper => self.paper += 1,
            Move::Scissors => self.scissors += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.rock + self.paper + self.scissors
    }
}

/// Summary counters persisted alongside the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_games: u32,
    pub wins: u32,
    #[serde(flatten)]
    pub moves: MoveCounts,
}

impl AggregateStats {
    /// Rebuilds the counters from a chronological history.
    pub fn from_history(history: &[MatchRecord]) -> Self {
        history.iter().fold(Self::default(), |mut stats, record| {
            stats.record(record.player, record.result);
            stats
        })
    }

    pub fn record(&mut self, player: Move, outcome: Outcome) {
        self.moves.increment(player);
        if outcome == Outcome::Win {
            self.wins += 1;
        }
        self.total_games += 1;
    }

    /// Running win rate in percent; 0 before the first round.
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.total_games) * 100.0
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.wins <= self.total_games && self.moves.total() == self.total_games
    }
}

/// Values shown on the score cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_games: u32,
    pub wins: u32,
    pub win_rate: String,
}

impl From<&AggregateStats> for StatsSummary {
    fn from(stats: &AggregateStats) -> Self {
        Self {
            total_games: stats.total_games,
            wins: stats.wins,
            win_rate: format_win_rate(stats.wins, stats.total_games),
        }
    }
}

pub fn format_win_rate(wins: u32, total_games: u32) -> String {
    if total_games == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", f64::from(wins) / f64::from(total_games) * 100.0)
}

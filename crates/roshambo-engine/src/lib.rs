//! Round resolution and running statistics for a single player.

mod opponent;

pub use opponent::{Opponent, RandomOpponent, ScriptedOpponent};

use roshambo_types::{
    moves::{Move, Outcome},
    record::{AggregateStats, MatchRecord, StatsSummary},
    timestamp_now, RoshamboError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the player sees after throwing a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub computer: Move,
    pub outcome: Outcome,
}

/// In-memory match state for the active player.
///
/// `win_rate_trend` always holds one more entry than there are rounds: it is
/// seeded with 0 and grows by one running percentage per round.
#[derive(Debug, Clone)]
pub struct GameEngine {
    history: Vec<MatchRecord>,
    stats: AggregateStats,
    win_rate_trend: Vec<f64>,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            stats: AggregateStats::default(),
            win_rate_trend: vec![0.0],
        }
    }

    /// Rebuilds counters and the full trend by replaying `history` in order.
    pub fn from_history(history: Vec<MatchRecord>) -> Self {
        let mut engine = Self::new();
        for record in history {
            engine.apply(record);
        }
        engine
    }

    /// Plays one round against `opponent`, stamping it with the current time.
    pub fn play(&mut self, player: Move, opponent: &mut dyn Opponent) -> RoundReport {
        let computer = opponent.choose();
        let outcome = self.resolve_round(player, computer, timestamp_now());
        RoundReport { computer, outcome }
    }

    /// Applies a round whose opponent move is already known.
    pub fn resolve_round(
        &mut self,
        player: Move,
        computer: Move,
        datetime: impl Into<String>,
    ) -> Outcome {
        let record = MatchRecord::new(datetime, player, computer);
        let outcome = record.result;
        self.apply(record);
        debug!(
            "Resolved round {}: {} vs {} -> {:?}",
            self.stats.total_games, player, computer, outcome
        );
        outcome
    }

    fn apply(&mut self, record: MatchRecord) {
        self.stats.record(record.player, record.result);
        self.win_rate_trend.push(self.stats.win_rate());
        self.history.push(record);
    }

    pub fn stats(&self) -> StatsSummary {
        StatsSummary::from(&self.stats)
    }

    pub fn aggregate(&self) -> &AggregateStats {
        &self.stats
    }

    /// Move counts keyed by display name, in rock/paper/scissors order.
    pub fn move_distribution(&self) -> Vec<(&'static str, u32)> {
        Move::ALL
            .iter()
            .map(|mv| (mv.display_name(), self.stats.moves.get(*mv)))
            .collect()
    }

    pub fn win_rate_trend(&self) -> &[f64] {
        &self.win_rate_trend
    }

    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }

    /// Newest `limit` rounds, most recent first.
    pub fn recent_history(&self, limit: usize) -> impl Iterator<Item = &MatchRecord> {
        self.history.iter().rev().take(limit)
    }

    pub fn score_line(&self) -> String {
        let stats = self.stats();
        format!(
            "Wins: {} | Total Games: {} | Win Rate: {}",
            stats.wins, stats.total_games, stats.win_rate
        )
    }
}

pub fn engine_error(message: impl Into<String>) -> RoshamboError {
    RoshamboError::Engine(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_trend(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.05, "trend {actual:?} != {expected:?}");
        }
    }

    #[test]
    fn fresh_engine_is_zeroed() {
        let engine = GameEngine::new();
        assert_eq!(engine.win_rate_trend(), &[0.0]);
        let stats = engine.stats();
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.win_rate, "0.0%");
        assert_eq!(
            engine.move_distribution(),
            vec![("Rock", 0), ("Paper", 0), ("Scissors", 0)]
        );
    }

    #[test]
    fn rock_beats_forced_scissors() {
        let mut engine = GameEngine::new();
        let mut opponent = ScriptedOpponent::new([Move::Scissors]).expect("script");
        let report = engine.play(Move::Rock, &mut opponent);
        assert_eq!(report.computer, Move::Scissors);
        assert_eq!(report.outcome, Outcome::Win);
        assert_eq!(engine.aggregate().wins, 1);
        assert_eq!(engine.aggregate().total_games, 1);
        assert_trend(engine.win_rate_trend(), &[0.0, 100.0]);
    }

    #[test]
    fn three_rock_rounds_against_script() {
        let mut engine = GameEngine::new();
        let mut opponent = ScriptedOpponent::new([Move::Paper, Move::Rock, Move::Scissors])
            .expect("script");
        let outcomes: Vec<Outcome> = (0..3)
            .map(|_| engine.play(Move::Rock, &mut opponent).outcome)
            .collect();
        assert_eq!(outcomes, vec![Outcome::Loss, Outcome::Tie, Outcome::Win]);
        assert_eq!(engine.aggregate().total_games, 3);
        assert_eq!(engine.aggregate().wins, 1);
        assert_trend(engine.win_rate_trend(), &[0.0, 0.0, 0.0, 33.3]);
        assert_eq!(engine.stats().win_rate, "33.3%");
    }

    #[test]
    fn invariants_hold_over_random_play() {
        let mut engine = GameEngine::new();
        let mut opponent = RandomOpponent::seeded(7);
        for n in 1..=60u32 {
            let player = Move::ALL[(n as usize * 5) % 3];
            engine.play(player, &mut opponent);
            let stats = engine.aggregate();
            assert_eq!(stats.total_games, n);
            assert_eq!(engine.win_rate_trend().len(), n as usize + 1);
            assert!(stats.wins <= stats.total_games);
            assert_eq!(stats.moves.total(), stats.total_games);
        }
    }

    #[test]
    fn replay_rebuilds_identical_state() {
        let mut engine = GameEngine::new();
        engine.resolve_round(Move::Paper, Move::Rock, "2024-03-01 09:00:00");
        engine.resolve_round(Move::Scissors, Move::Rock, "2024-03-01 09:00:05");
        engine.resolve_round(Move::Rock, Move::Rock, "2024-03-01 09:00:09");

        let rebuilt = GameEngine::from_history(engine.history().to_vec());
        assert_eq!(rebuilt.aggregate(), engine.aggregate());
        assert_eq!(rebuilt.win_rate_trend(), engine.win_rate_trend());
        assert_eq!(rebuilt.history(), engine.history());
    }

    #[test]
    fn recent_history_is_newest_first() {
        let mut engine = GameEngine::new();
        engine.resolve_round(Move::Rock, Move::Paper, "2024-03-01 09:00:00");
        engine.resolve_round(Move::Paper, Move::Paper, "2024-03-01 09:00:01");
        engine.resolve_round(Move::Scissors, Move::Paper, "2024-03-01 09:00:02");

        let recent: Vec<&str> = engine
            .recent_history(2)
            .map(|record| record.datetime.as_str())
            .collect();
        assert_eq!(recent, vec!["2024-03-01 09:00:02", "2024-03-01 09:00:01"]);
        assert_eq!(
            engine.score_line(),
            "Wins: 1 | Total Games: 3 | Win Rate: 33.3%"
        );
    }
}

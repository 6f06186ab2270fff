use std::collections::VecDeque;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use roshambo_types::{moves::Move, Result};

use crate::engine_error;

/// Source of the computer's moves.
pub trait Opponent {
    fn choose(&mut self) -> Move;
}

/// Picks each move with probability 1/3, ignoring history.
pub struct RandomOpponent {
    rng: SmallRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RandomOpponent {
    fn choose(&mut self) -> Move {
        Move::ALL[self.rng.random_range(0..Move::ALL.len())]
    }
}

/// Replays a fixed sequence of moves, wrapping around when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedOpponent {
    script: VecDeque<Move>,
}

impl ScriptedOpponent {
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Result<Self> {
        let script: VecDeque<Move> = moves.into_iter().collect();
        if script.is_empty() {
            return Err(engine_error("scripted opponent needs at least one move"));
        }
        Ok(Self { script })
    }
}

impl Opponent for ScriptedOpponent {
    fn choose(&mut self) -> Move {
        // Non-empty by construction.
        let next = self.script[0];
        self.script.rotate_left(1);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_opponent_is_roughly_uniform() {
        let mut opponent = RandomOpponent::seeded(42);
        let mut counts = [0u32; 3];
        for _ in 0..3_000 {
            let idx = Move::ALL
                .iter()
                .position(|mv| *mv == opponent.choose())
                .expect("known move");
            counts[idx] += 1;
        }
        for count in counts {
            assert!((800..=1200).contains(&count), "skewed counts {counts:?}");
        }
    }

    #[test]
    fn scripted_opponent_wraps() {
        let mut opponent = ScriptedOpponent::new([Move::Rock, Move::Paper]).expect("script");
        assert!(ScriptedOpponent::new([]).is_err());
        let drawn: Vec<Move> = (0..3).map(|_| opponent.choose()).collect();
        assert_eq!(drawn, vec![Move::Rock, Move::Paper, Move::Rock]);
    }
}

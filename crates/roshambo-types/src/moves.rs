use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::RoshamboError;

/// One of the three hand shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// The move this one defeats.
    pub fn beats(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Paper => Move::Rock,
            Move::Scissors => Move::Paper,
        }
    }

    /// Outcome from the perspective of the player throwing `self`.
    pub fn against(self, opponent: Move) -> Outcome {
        if self == opponent {
            Outcome::Tie
        } else if self.beats() == opponent {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }

    /// Capitalised label used by charts and the history view.
    pub fn display_name(self) -> &'static str {
        match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = RoshamboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Move::Rock),
            "paper" | "p" => Ok(Move::Paper),
            "scissors" | "s" => Ok(Move::Scissors),
            _ => Err(RoshamboError::InvalidMove(s.to_string())),
        }
    }
}

/// Result of a round from the player's perspective.
///
/// Serialized with the plural words used by existing data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "wins", alias = "win")]
    Win,
    #[serde(rename = "losses", alias = "loss")]
    Loss,
    #[serde(rename = "ties", alias = "tie")]
    Tie,
}

impl Outcome {
    pub fn headline(self) -> &'static str {
        match self {
            Outcome::Win => "You win!",
            Outcome::Loss => "You lose!",
            Outcome::Tie => "It's a tie!",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
            Outcome::Tie => "Tie",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use super::PlayerStat;

/// Wickets that end an innings.
pub const WICKETS_PER_INNINGS: u8 = 10;

/// Legal deliveries in one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Whole overs plus balls in the over currently in progress.
///
/// The ball component always stays in [0,5]; the sixth legal delivery rolls
/// into the next whole over. Displays as "3.2".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Overs {
    pub overs: u16,
    pub balls: u8,
}

impl Overs {
    pub fn total_balls(&self) -> u32 {
        self.overs as u32 * BALLS_PER_OVER + self.balls as u32
    }

    pub fn from_balls(total: u32) -> Self {
        Self { overs: (total / BALLS_PER_OVER) as u16, balls: (total % BALLS_PER_OVER) as u8 }
    }

    /// Advance by one legal delivery. Returns true when that delivery
    /// completed an over.
    pub fn add_ball(&mut self) -> bool {
        *self = Self::from_balls(self.total_balls() + 1);
        self.balls == 0
    }
}

impl fmt::Display for Overs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.overs, self.balls)
    }
}

/// One side of the match with its cumulative innings figures.
///
/// `players` keeps insertion order (the order names were introduced), which
/// is also how the striker/non-striker/bowler indices on `MatchState` are
/// resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub players: Vec<PlayerStat>,
    pub is_batting: bool,
    pub score: u32,
    pub wickets: u8,
    /// Runs credited to the team but to no batter (wides, no-balls, byes).
    pub extras: u32,
    pub overs_played: Overs,
}

impl Team {
    pub fn new(name: impl Into<String>, is_batting: bool) -> Self {
        Self {
            name: name.into(),
            players: Vec::new(),
            is_batting,
            score: 0,
            wickets: 0,
            extras: 0,
            overs_played: Overs::default(),
        }
    }

    /// Append a fresh player and return their index.
    pub fn add_player(&mut self, name: impl Into<String>) -> usize {
        self.players.push(PlayerStat::new(name));
        self.players.len() - 1
    }

    pub fn all_out(&self) -> bool {
        self.wickets >= WICKETS_PER_INNINGS
    }

    /// Aggregate consistency check: the team score must equal the sum of
    /// its players' batting runs plus the extras tally, and wickets must
    /// not exceed ten.
    pub fn validate(&self) -> Result<(), String> {
        let bat_runs: u32 = self.players.iter().map(|p| p.runs).sum();
        if bat_runs + self.extras != self.score {
            return Err(format!(
                "team {} score {} != player runs {} + extras {}",
                self.name, self.score, bat_runs, self.extras
            ));
        }
        if self.wickets > WICKETS_PER_INNINGS {
            return Err(format!("team {} has {} wickets", self.name, self.wickets));
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

/// What the toss winner elected to do first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossDecision {
    Bat,
    Bowl,
}

/// Match configuration, immutable once the match starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchConfig {
    pub team_a: String,
    pub team_b: String,
    pub total_overs: u16,
    pub toss_winner: String,
    pub elected_to: TossDecision,
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.team_a.trim().is_empty() || self.team_b.trim().is_empty() {
            return Err("team names must not be empty".to_string());
        }
        if self.team_a == self.team_b {
            return Err(format!("both teams are named {}", self.team_a));
        }
        if self.total_overs == 0 {
            return Err("total overs must be at least 1".to_string());
        }
        if self.toss_winner != self.team_a && self.toss_winner != self.team_b {
            return Err(format!("toss winner {} is not one of the teams", self.toss_winner));
        }
        Ok(())
    }

    /// The side that takes the first innings, determined by the toss.
    pub fn batting_first(&self) -> &str {
        match self.elected_to {
            TossDecision::Bat => &self.toss_winner,
            TossDecision::Bowl => self.other_team(&self.toss_winner),
        }
    }

    pub fn other_team(&self, name: &str) -> &str {
        if name == self.team_a {
            &self.team_b
        } else {
            &self.team_a
        }
    }
}

/// Names supplied when an innings opens: two batters and the bowler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpeningPlayers {
    pub striker: String,
    pub non_striker: String,
    pub bowler: String,
}

impl OpeningPlayers {
    pub fn validate(&self) -> Result<(), String> {
        if self.striker.trim().is_empty()
            || self.non_striker.trim().is_empty()
            || self.bowler.trim().is_empty()
        {
            return Err("opening player names must not be empty".to_string());
        }
        if self.striker == self.non_striker {
            return Err(format!("{} cannot bat at both ends", self.striker));
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

/// One player's cumulative figures for the match.
///
/// A player accumulates both a batting and a bowling tally, so all-rounders
/// need no special casing. Entries are created on demand when a name is
/// introduced (opening players, replacement batter, next bowler) and are
/// never removed for the duration of the match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerStat {
    pub name: String,

    // Batting tally
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub is_out: bool,
    /// Dismissal description, e.g. "b Starc".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_by: Option<String>,

    // Bowling tally
    pub balls_bowled: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub maidens: u32,
}

impl PlayerStat {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            is_out: false,
            out_by: None,
            balls_bowled: 0,
            runs_conceded: 0,
            wickets: 0,
            maidens: 0,
        }
    }

    /// Completed-overs display for a bowler, e.g. "2.4".
    ///
    /// Derived from `balls_bowled` rather than stored, so it can never drift
    /// from the ball count.
    pub fn bowling_overs(&self) -> String {
        format!("{}.{}", self.balls_bowled / 6, self.balls_bowled % 6)
    }

    pub fn has_bowled(&self) -> bool {
        self.balls_bowled > 0
    }

    /// Scorecard batting line, e.g. "Root 34 (21)".
    pub fn batting_line(&self) -> String {
        format!("{} {} ({})", self.name, self.runs, self.balls)
    }

    /// Scorecard bowling line in O-M-R-W form, e.g. "Starc 3.2-1-18-2".
    pub fn bowling_line(&self) -> String {
        format!(
            "{} {}-{}-{}-{}",
            self.name,
            self.bowling_overs(),
            self.maidens,
            self.runs_conceded,
            self.wickets
        )
    }
}

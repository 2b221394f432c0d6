use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{MatchConfig, PlayerStat, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Innings {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Live,
    Completed,
}

/// Side-request raised by the innings/match controller.
///
/// While anything other than `None` is outstanding, ball events are
/// rejected; the presentation layer must resolve the request first
/// (supply a batter or bowler name, or start the second innings).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pending {
    #[default]
    None,
    NewBatter,
    NewBowler,
    InningsBreak,
}

/// One entry in the append-only chronological ball log. The log spans both
/// innings and is never cleared; the innings tag lets callers slice it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BallRecord {
    pub innings: Innings,
    pub token: String,
}

/// The aggregate match snapshot.
///
/// Treated as an immutable value by the engine: every operation clones the
/// snapshot and returns the transformed copy, which keeps the undo stack a
/// plain list of prior values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchState {
    pub id: String,
    /// Creation timestamp, RFC3339.
    pub date: String,
    pub config: MatchConfig,
    pub innings: Innings,

    /// Team identities swap between these two slots at the innings break.
    pub batting_team: Team,
    pub bowling_team: Team,

    /// Indices into `batting_team.players` / `bowling_team.players`.
    pub striker: usize,
    pub non_striker: usize,
    pub bowler: usize,

    /// Display tokens for the over in progress; cleared every 6 legal balls.
    pub this_over: Vec<String>,
    pub ball_log: Vec<BallRecord>,

    /// First innings score + 1; set exactly once at the innings handover.
    pub target: Option<u32>,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_margin: Option<String>,

    #[serde(default)]
    pub pending: Pending,
    /// An over just completed and the next bowler has not been chosen yet.
    /// Lets a wicket on the final ball raise NewBatter first and NewBowler
    /// right after.
    #[serde(default)]
    pub bowler_due: bool,
    /// Runs conceded by the current bowler in the over in progress; an over
    /// that completes at zero credits a maiden.
    #[serde(default)]
    pub conceded_this_over: u32,
}

impl MatchState {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn now_rfc3339() -> String {
        OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
    }

    pub fn current_striker(&self) -> &PlayerStat {
        &self.batting_team.players[self.striker]
    }

    pub fn current_non_striker(&self) -> &PlayerStat {
        &self.batting_team.players[self.non_striker]
    }

    pub fn current_bowler(&self) -> &PlayerStat {
        &self.bowling_team.players[self.bowler]
    }

    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }

    /// Legal deliveries bowled so far in the current innings.
    pub fn legal_balls_bowled(&self) -> u32 {
        self.batting_team.overs_played.total_balls()
    }

    pub fn max_balls(&self) -> u32 {
        self.config.total_overs as u32 * super::team::BALLS_PER_OVER
    }

    pub fn overs_exhausted(&self) -> bool {
        self.legal_balls_bowled() >= self.max_balls()
    }

    /// All out or overs exhausted; target-reached completion is handled by
    /// the controller separately because it ends the match outright.
    pub fn innings_over(&self) -> bool {
        self.batting_team.all_out() || self.overs_exhausted()
    }

    pub fn balls_remaining(&self) -> u32 {
        self.max_balls().saturating_sub(self.legal_balls_bowled())
    }

    /// Runs still required by the chasing side, second innings only.
    pub fn runs_needed(&self) -> Option<u32> {
        self.target.map(|t| t.saturating_sub(self.batting_team.score))
    }

    /// Index-reference and aggregate invariants, checked by tests.
    pub fn validate(&self) -> Result<(), String> {
        self.batting_team.validate()?;
        self.bowling_team.validate()?;
        if self.striker >= self.batting_team.players.len()
            || self.non_striker >= self.batting_team.players.len()
        {
            return Err("batter index out of range".to_string());
        }
        if self.bowler >= self.bowling_team.players.len() {
            return Err("bowler index out of range".to_string());
        }
        if self.striker == self.non_striker {
            return Err("striker and non-striker are the same batter".to_string());
        }
        if self.batting_team.is_batting == self.bowling_team.is_batting {
            return Err("exactly one team must be batting".to_string());
        }
        Ok(())
    }
}

//! Canonical match data model: players, teams, configuration, ball events,
//! and the aggregate `MatchState` snapshot.

pub mod events;
pub mod match_setup;
pub mod match_state;
pub mod player;
pub mod team;

pub use events::{BallEvent, VALID_RUN_VALUES};
pub use match_setup::{MatchConfig, OpeningPlayers, TossDecision};
pub use match_state::{BallRecord, Innings, MatchState, MatchStatus, Pending};
pub use player::PlayerStat;
pub use team::{Overs, Team, BALLS_PER_OVER, WICKETS_PER_INNINGS};

//! The match engine: ball processor, innings/match controller, innings
//! handover, undo stack, and rate helpers.
//!
//! Every operation is a pure transition on `MatchState`: callers hand in a
//! snapshot and get a new one back, or an error with the input untouched.

pub mod ball;
pub mod controller;
pub mod innings;
pub mod stats;
pub mod undo;

pub use ball::apply_event;
pub use controller::{resolve_new_batter, resolve_new_bowler, BowlerPick};
pub use innings::begin_second_innings;
pub use undo::{UndoStack, UNDO_CAPACITY};

use crate::error::{EngineError, Result};
use crate::models::{
    Innings, MatchConfig, MatchState, MatchStatus, OpeningPlayers, Pending, Team,
};

/// Create the innings-1 snapshot for a configured match.
///
/// The toss decides which side bats; the three opening names seed the two
/// rosters. Everything else starts empty: no target, empty logs, live
/// status, no side request outstanding.
pub fn start_match(config: MatchConfig, opening: OpeningPlayers) -> Result<MatchState> {
    config.validate().map_err(EngineError::InvalidEvent)?;
    opening.validate().map_err(EngineError::InvalidEvent)?;

    let batting_name = config.batting_first().to_string();
    let bowling_name = config.other_team(&batting_name).to_string();

    let mut batting_team = Team::new(batting_name, true);
    let mut bowling_team = Team::new(bowling_name, false);

    let OpeningPlayers { striker, non_striker, bowler } = opening;
    let striker = batting_team.add_player(striker);
    let non_striker = batting_team.add_player(non_striker);
    let bowler = bowling_team.add_player(bowler);

    let state = MatchState {
        id: MatchState::new_id(),
        date: MatchState::now_rfc3339(),
        config,
        innings: Innings::First,
        batting_team,
        bowling_team,
        striker,
        non_striker,
        bowler,
        this_over: Vec::new(),
        ball_log: Vec::new(),
        target: None,
        status: MatchStatus::Live,
        winner: None,
        win_margin: None,
        pending: Pending::None,
        bowler_due: false,
        conceded_this_over: 0,
    };

    log::info!(
        "match {}: {} bat first against {} over {} overs",
        state.id,
        state.batting_team.name,
        state.bowling_team.name,
        state.config.total_overs
    );
    Ok(state)
}

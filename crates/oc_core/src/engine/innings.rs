use crate::error::{EngineError, Result};
use crate::models::{Innings, MatchState, OpeningPlayers, Pending, Team};

use super::controller;

/// Hand the match over to the second innings.
///
/// Requires the first innings to have actually ended (an InningsBreak
/// request outstanding). Swaps the batting/bowling roles of the two teams,
/// fixes the target at the first-innings score plus one, and opens the
/// innings with the supplied batters and bowler. The cumulative ball log is
/// kept; only the per-over working buffers reset.
pub fn begin_second_innings(state: &MatchState, opening: OpeningPlayers) -> Result<MatchState> {
    if state.innings == Innings::Second {
        return Err(EngineError::InvalidTransition(
            "second innings is already under way".to_string(),
        ));
    }
    if state.pending != Pending::InningsBreak {
        return Err(EngineError::InvalidTransition(
            "first innings has not ended".to_string(),
        ));
    }
    opening.validate().map_err(EngineError::InvalidEvent)?;

    let mut next = state.clone();
    let target = next.batting_team.score + 1;

    std::mem::swap(&mut next.batting_team, &mut next.bowling_team);
    next.batting_team.is_batting = true;
    next.bowling_team.is_batting = false;

    let OpeningPlayers { striker, non_striker, bowler } = opening;
    next.striker = add_or_reuse(&mut next.batting_team, striker);
    next.non_striker = add_or_reuse(&mut next.batting_team, non_striker);
    next.bowler = add_or_reuse(&mut next.bowling_team, bowler);

    next.innings = Innings::Second;
    next.target = Some(target);
    next.this_over.clear();
    next.bowler_due = false;
    next.conceded_this_over = 0;
    next.pending = Pending::None;

    log::info!(
        "second innings: {} need {} from {} overs",
        next.batting_team.name,
        target,
        next.config.total_overs
    );

    controller::settle(&mut next);
    Ok(next)
}

/// Players who already appear on the side (they bowled or batted in the
/// first innings) keep their figures; fresh names are appended.
fn add_or_reuse(team: &mut Team, name: String) -> usize {
    match team.players.iter().position(|p| p.name == name) {
        Some(idx) => idx,
        None => team.add_player(name),
    }
}

use crate::error::{EngineError, Result};
use crate::models::{BallEvent, BallRecord, MatchState, MatchStatus, Pending, VALID_RUN_VALUES};

use super::controller;

/// Apply one ball event to a snapshot and return the successor snapshot.
///
/// Pure transition: the input is never mutated, so the caller can keep it on
/// the undo stack. Rejected (with no state change) while the match is
/// completed or a side request is outstanding.
pub fn apply_event(state: &MatchState, event: BallEvent) -> Result<MatchState> {
    if state.status != MatchStatus::Live {
        return Err(EngineError::InvalidState("match is already completed".to_string()));
    }
    if state.pending != Pending::None {
        return Err(EngineError::InvalidState(format!(
            "unresolved side request: {:?}",
            state.pending
        )));
    }
    if let BallEvent::Runs { value } = event {
        if !VALID_RUN_VALUES.contains(&value) {
            return Err(EngineError::InvalidEvent(format!(
                "cannot score {} runs off the bat",
                value
            )));
        }
    }

    let mut next = state.clone();
    let token = event.token();
    let mut runs_off_bat = 0u32;

    match event {
        BallEvent::Runs { value } => {
            let value = value as u32;
            runs_off_bat = value;
            let striker = &mut next.batting_team.players[next.striker];
            striker.runs += value;
            striker.balls += 1;
            if value == 4 {
                striker.fours += 1;
            }
            if value == 6 {
                striker.sixes += 1;
            }
            let bowler = &mut next.bowling_team.players[next.bowler];
            bowler.runs_conceded += value;
            bowler.balls_bowled += 1;
            next.batting_team.score += value;
            next.conceded_this_over += value;
        }
        BallEvent::Wicket => {
            let bowler_name = next.current_bowler().name.clone();
            let striker = &mut next.batting_team.players[next.striker];
            striker.balls += 1;
            striker.is_out = true;
            striker.out_by = Some(format!("b {}", bowler_name));
            let bowler = &mut next.bowling_team.players[next.bowler];
            bowler.balls_bowled += 1;
            bowler.wickets += 1;
            next.batting_team.wickets += 1;
        }
        BallEvent::Wide | BallEvent::NoBall => {
            // Single-run penalty to the team; no ball faced, over unchanged.
            next.batting_team.score += 1;
            next.batting_team.extras += 1;
            next.bowling_team.players[next.bowler].runs_conceded += 1;
            next.conceded_this_over += 1;
        }
        BallEvent::Bye { value } => {
            let value = value as u32;
            next.batting_team.score += value;
            next.batting_team.extras += value;
        }
    }

    next.this_over.push(token.clone());

    if event.is_legal_delivery() {
        let over_done = next.batting_team.overs_played.add_ball();
        if over_done {
            if next.conceded_this_over == 0 {
                next.bowling_team.players[next.bowler].maidens += 1;
            }
            next.conceded_this_over = 0;
            next.this_over.clear();
            // Ends change at the over break regardless of the final ball.
            std::mem::swap(&mut next.striker, &mut next.non_striker);
            next.bowler_due = true;
        } else if runs_off_bat % 2 == 1 {
            std::mem::swap(&mut next.striker, &mut next.non_striker);
        }
    }

    next.ball_log.push(BallRecord { innings: next.innings, token });

    controller::settle(&mut next);
    Ok(next)
}

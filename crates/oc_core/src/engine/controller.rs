use crate::error::{EngineError, Result};
use crate::models::{Innings, MatchState, MatchStatus, Pending, WICKETS_PER_INNINGS};

/// How the next bowler is chosen at an over break: an index into the bowling
/// side's player list, or a name (reused if that name has bowled before).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BowlerPick {
    Existing(usize),
    New(String),
}

/// Inspect a freshly transformed snapshot and decide what happens next:
/// finish the match, raise a side request, or accept further balls.
///
/// Runs once per transition and writes its verdict into `state.pending`
/// (and, on completion, the winner fields), so the presentation layer only
/// branches on a tag instead of re-deriving the rules.
pub(crate) fn settle(state: &mut MatchState) {
    if state.status != MatchStatus::Live {
        return;
    }

    if state.innings == Innings::Second {
        if let Some(target) = state.target {
            let score = state.batting_team.score;
            if score > target {
                let margin = wickets_margin(state);
                finish(state, state.batting_team.name.clone(), margin);
                return;
            }
            if state.innings_over() {
                if score >= target {
                    let margin = wickets_margin(state);
                    finish(state, state.batting_team.name.clone(), margin);
                } else if score == target - 1 {
                    finish(state, "Draw".to_string(), "Match drawn".to_string());
                } else {
                    let deficit = target - 1 - score;
                    let margin = format!(
                        "{} won by {} {}",
                        state.bowling_team.name,
                        deficit,
                        plural(deficit, "run")
                    );
                    finish(state, state.bowling_team.name.clone(), margin);
                }
                return;
            }
        }
    }

    if state.innings == Innings::First && state.innings_over() {
        state.pending = Pending::InningsBreak;
        return;
    }

    // A dismissed batter can sit at either end: the end-of-over swap moves
    // the striker across before the controller runs.
    if state.current_striker().is_out || state.current_non_striker().is_out {
        state.pending = Pending::NewBatter;
        return;
    }

    if state.bowler_due {
        state.pending = Pending::NewBowler;
        return;
    }

    state.pending = Pending::None;
}

fn wickets_margin(state: &MatchState) -> String {
    let left = (WICKETS_PER_INNINGS - state.batting_team.wickets) as u32;
    format!("{} won by {} {}", state.batting_team.name, left, plural(left, "wicket"))
}

fn plural(n: u32, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

fn finish(state: &mut MatchState, winner: String, margin: String) {
    state.status = MatchStatus::Completed;
    state.winner = Some(winner);
    state.win_margin = Some(margin.clone());
    state.pending = Pending::None;
    state.bowler_due = false;
    log::info!("match {} complete: {}", state.id, margin);
}

/// Bring in a replacement batter for whichever end holds the dismissed
/// player. Only valid while a NewBatter request is outstanding.
pub fn resolve_new_batter(state: &MatchState, name: &str) -> Result<MatchState> {
    if state.pending != Pending::NewBatter {
        return Err(EngineError::InvalidTransition(
            "no new-batter request outstanding".to_string(),
        ));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(EngineError::InvalidEvent("batter name must not be empty".to_string()));
    }
    if state.batting_team.players.iter().any(|p| p.name == name) {
        return Err(EngineError::InvalidEvent(format!("{} has already batted", name)));
    }

    let mut next = state.clone();
    let idx = next.batting_team.add_player(name);
    if next.current_striker().is_out {
        next.striker = idx;
    } else {
        next.non_striker = idx;
    }
    log::debug!("{} comes in to bat", name);

    settle(&mut next);
    Ok(next)
}

/// Select the bowler for the next over. Re-selecting the previous bowler is
/// allowed; picking a name that already exists on the bowling side reuses
/// that player's figures.
pub fn resolve_new_bowler(state: &MatchState, pick: BowlerPick) -> Result<MatchState> {
    if state.pending != Pending::NewBowler {
        return Err(EngineError::InvalidTransition(
            "no new-bowler request outstanding".to_string(),
        ));
    }

    let mut next = state.clone();
    let idx = match pick {
        BowlerPick::Existing(idx) => {
            if idx >= next.bowling_team.players.len() {
                return Err(EngineError::InvalidEvent(format!("no bowler at index {}", idx)));
            }
            idx
        }
        BowlerPick::New(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(EngineError::InvalidEvent(
                    "bowler name must not be empty".to_string(),
                ));
            }
            match next.bowling_team.players.iter().position(|p| p.name == name) {
                Some(existing) => existing,
                None => next.bowling_team.add_player(name),
            }
        }
    };

    next.bowler = idx;
    next.bowler_due = false;
    next.conceded_this_over = 0;
    log::debug!("{} to bowl the next over", next.current_bowler().name);

    settle(&mut next);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ball::apply_event;
    use crate::engine::{begin_second_innings, start_match};
    use crate::models::{BallEvent, MatchConfig, OpeningPlayers, TossDecision};

    fn fresh_match(total_overs: u16) -> MatchState {
        let config = MatchConfig {
            team_a: "India".to_string(),
            team_b: "Australia".to_string(),
            total_overs,
            toss_winner: "India".to_string(),
            elected_to: TossDecision::Bat,
        };
        let opening = OpeningPlayers {
            striker: "Rohit".to_string(),
            non_striker: "Gill".to_string(),
            bowler: "Starc".to_string(),
        };
        start_match(config, opening).unwrap()
    }

    /// Drive the first innings to a given score and let the overs run out.
    fn first_innings_total(total_overs: u16, score: u32) -> MatchState {
        let mut state = fresh_match(total_overs);
        let mut remaining = score;
        let mut joined = 0;
        while state.pending != Pending::InningsBreak {
            match state.pending {
                Pending::None => {
                    let value = if remaining >= 4 {
                        4
                    } else if remaining >= 1 {
                        1
                    } else {
                        0
                    };
                    remaining -= value as u32;
                    state = apply_event(&state, BallEvent::Runs { value }).unwrap();
                }
                Pending::NewBowler => {
                    joined += 1;
                    state = resolve_new_bowler(&state, BowlerPick::New(format!("B{}", joined)))
                        .unwrap();
                }
                other => panic!("unexpected pending {:?}", other),
            }
        }
        assert_eq!(state.batting_team.score, score);
        state
    }

    fn start_chase(total_overs: u16, first_score: u32) -> MatchState {
        let state = first_innings_total(total_overs, first_score);
        let opening = OpeningPlayers {
            striker: "Warner".to_string(),
            non_striker: "Smith".to_string(),
            bowler: "Bumrah".to_string(),
        };
        begin_second_innings(&state, opening).unwrap()
    }

    #[test]
    fn test_all_out_triggers_innings_break_at_tenth_wicket() {
        let mut state = fresh_match(20);
        let mut joined = 0;
        // Ten wickets straddle an over break: the sixth legal ball completes
        // the over, so a NewBowler request follows the batter replacement.
        while state.pending != Pending::InningsBreak {
            match state.pending {
                Pending::None => {
                    state = apply_event(&state, BallEvent::Wicket).unwrap();
                    assert!(state.batting_team.wickets <= 10);
                }
                Pending::NewBatter => {
                    joined += 1;
                    state = resolve_new_batter(&state, &format!("N{}", joined)).unwrap();
                }
                Pending::NewBowler => {
                    joined += 1;
                    state = resolve_new_bowler(&state, BowlerPick::New(format!("B{}", joined)))
                        .unwrap();
                }
                Pending::InningsBreak => unreachable!(),
            }
        }
        assert_eq!(state.batting_team.wickets, 10);
        assert!(state.batting_team.all_out());
        assert_eq!(state.legal_balls_bowled(), 10);
        let err = apply_event(&state, BallEvent::Runs { value: 0 }).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[test]
    fn test_overs_exhausted_triggers_innings_break() {
        let state = first_innings_total(1, 6);
        assert_eq!(state.pending, Pending::InningsBreak);
        assert_eq!(state.legal_balls_bowled(), 6);
    }

    #[test]
    fn test_chase_win_margin_in_wickets() {
        // First innings 151 for a target of 152; chase passes it three down.
        let mut state = start_chase(20, 151);
        assert_eq!(state.target, Some(152));
        let mut joined = 0;
        while state.is_live() {
            match state.pending {
                Pending::None => {
                    state = apply_event(&state, BallEvent::Runs { value: 6 }).unwrap();
                }
                Pending::NewBowler => {
                    joined += 1;
                    state = resolve_new_bowler(&state, BowlerPick::New(format!("B{}", joined)))
                        .unwrap();
                }
                other => panic!("unexpected pending {:?}", other),
            }
        }
        assert_eq!(state.status, MatchStatus::Completed);
        assert_eq!(state.winner.as_deref(), Some("Australia"));
        assert_eq!(state.win_margin.as_deref(), Some("Australia won by 10 wickets"));
    }

    #[test]
    fn test_defence_win_margin_in_runs() {
        // Target 151; the chase folds for 30.
        let mut state = start_chase(20, 150);
        assert_eq!(state.target, Some(151));
        for value in [6, 6, 6, 6, 6] {
            state = apply_event(&state, BallEvent::Runs { value }).unwrap();
        }
        let mut joined = 0;
        while state.is_live() {
            match state.pending {
                Pending::None => state = apply_event(&state, BallEvent::Wicket).unwrap(),
                Pending::NewBatter => {
                    joined += 1;
                    state = resolve_new_batter(&state, &format!("N{}", joined)).unwrap();
                }
                Pending::NewBowler => {
                    joined += 1;
                    state = resolve_new_bowler(&state, BowlerPick::New(format!("B{}", joined)))
                        .unwrap();
                }
                other => panic!("unexpected pending {:?}", other),
            }
        }
        assert_eq!(state.status, MatchStatus::Completed);
        assert_eq!(state.winner.as_deref(), Some("India"));
        assert_eq!(state.win_margin.as_deref(), Some("India won by 120 runs"));
    }

    #[test]
    fn test_one_run_defeat_and_draw() {
        // Target 7 from one over: 6 runs is a draw, 5 loses by one run.
        let mut state = start_chase(1, 6);
        for value in [1, 1, 1, 1, 1, 1] {
            state = apply_event(&state, BallEvent::Runs { value }).unwrap();
        }
        assert_eq!(state.winner.as_deref(), Some("Draw"));
        assert_eq!(state.win_margin.as_deref(), Some("Match drawn"));

        let mut state = start_chase(1, 6);
        for value in [1, 1, 1, 1, 1, 0] {
            state = apply_event(&state, BallEvent::Runs { value }).unwrap();
        }
        assert_eq!(state.winner.as_deref(), Some("India"));
        assert_eq!(state.win_margin.as_deref(), Some("India won by 1 run"));
    }

    #[test]
    fn test_finishing_exactly_on_target_wins_the_chase() {
        // Target 7; the last ball lands exactly on 7: a successful chase,
        // not a defence win with a negative margin.
        let mut state = start_chase(1, 6);
        for value in [1, 1, 1, 1, 1, 2] {
            state = apply_event(&state, BallEvent::Runs { value }).unwrap();
        }
        assert_eq!(state.status, MatchStatus::Completed);
        assert_eq!(state.winner.as_deref(), Some("Australia"));
        assert_eq!(state.win_margin.as_deref(), Some("Australia won by 10 wickets"));
    }

    #[test]
    fn test_completed_match_rejects_everything() {
        let mut state = start_chase(1, 2);
        state = apply_event(&state, BallEvent::Runs { value: 4 }).unwrap();
        assert_eq!(state.status, MatchStatus::Completed);

        assert!(apply_event(&state, BallEvent::Wide).is_err());
        assert!(resolve_new_batter(&state, "X").is_err());
        assert!(resolve_new_bowler(&state, BowlerPick::Existing(0)).is_err());
    }

    #[test]
    fn test_resolutions_rejected_without_matching_request() {
        let state = fresh_match(20);
        assert!(matches!(
            resolve_new_batter(&state, "Kohli"),
            Err(EngineError::InvalidTransition(_))
        ));
        assert!(matches!(
            resolve_new_bowler(&state, BowlerPick::Existing(0)),
            Err(EngineError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_new_bowler_by_name_reuses_existing_figures() {
        let mut state = fresh_match(20);
        for _ in 0..6 {
            state = apply_event(&state, BallEvent::Runs { value: 0 }).unwrap();
        }
        assert_eq!(state.pending, Pending::NewBowler);
        state = resolve_new_bowler(&state, BowlerPick::New("Starc".to_string())).unwrap();
        assert_eq!(state.bowling_team.players.len(), 1);
        assert_eq!(state.bowler, 0);
    }

    #[test]
    fn test_duplicate_batter_name_rejected() {
        let mut state = fresh_match(20);
        state = apply_event(&state, BallEvent::Wicket).unwrap();
        let err = resolve_new_batter(&state, "Gill").unwrap_err();
        assert!(matches!(err, EngineError::InvalidEvent(_)));
    }
}

//! JSON boundary over the scoring engine.
//!
//! Every entry point takes and returns JSON strings so non-Rust embedders
//! (a GUI shell, an FFI layer) can drive a match without linking against
//! the engine types. Errors come back as `"CODE: message"` strings keyed
//! by [`super::error_codes`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::error_codes;
use crate::analysis::MatchBrief;
use crate::engine::BowlerPick;
use crate::models::{BallEvent, MatchConfig, MatchState, MatchStatus, OpeningPlayers};
use crate::save::SaveStore;
use crate::state::{self, ScoringSession};
use crate::SCHEMA_VERSION;

static STORE: Lazy<SaveStore> = Lazy::new(SaveStore::default_location);

pub(crate) fn store() -> &'static SaveStore {
    &STORE
}

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn check_schema(version: u8) -> Result<(), String> {
    if version != SCHEMA_VERSION {
        return Err(err_code(
            error_codes::UNSUPPORTED_SCHEMA_VERSION,
            format!("expected {SCHEMA_VERSION}, got {version}"),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct StartMatchRequest {
    pub schema_version: u8,
    pub config: MatchConfig,
    pub opening: OpeningPlayers,
}

#[derive(Debug, Deserialize)]
pub struct ScoreBallRequest {
    pub schema_version: u8,
    pub event: BallEvent,
}

#[derive(Debug, Deserialize)]
pub struct NewBatterRequest {
    pub schema_version: u8,
    pub name: String,
}

/// Exactly one of `existing_index` and `name` should be set; `name` takes
/// effect only when no index is given.
#[derive(Debug, Deserialize)]
pub struct NewBowlerRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub existing_index: Option<usize>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SecondInningsRequest {
    pub schema_version: u8,
    pub opening: OpeningPlayers,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    pub state: MatchState,
    pub undo_depth: usize,
}

/// One archived match, condensed for a history screen.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: String,
    pub date: String,
    pub title: String,
    pub result: String,
}

fn respond(session: &ScoringSession) -> Result<String, String> {
    let response = MatchResponse {
        schema_version: SCHEMA_VERSION,
        state: session.state().clone(),
        undo_depth: session.undo_depth(),
    };
    serde_json::to_string(&response).map_err(|e| err_code(error_codes::BAD_REQUEST, e))
}

/// Persist the latest snapshot. Mid-match saves are best effort; the
/// completion archive write must succeed because it is the only durable
/// record of the finished match.
fn persist(state: &MatchState) -> Result<(), String> {
    if state.status == MatchStatus::Completed {
        STORE
            .append_to_history(state)
            .map_err(|e| err_code(error_codes::PERSISTENCE_FAILED, e))?;
        if let Err(e) = STORE.clear_active() {
            log::warn!("failed to clear active save after completion: {e}");
        }
    } else if let Err(e) = STORE.save_active(state) {
        log::warn!("mid-match save failed: {e}");
    }
    Ok(())
}

fn with_active_session(
    f: impl FnOnce(&mut ScoringSession) -> Result<(), String>,
) -> Result<String, String> {
    state::with_session(|session| {
        f(session)?;
        persist(session.state())?;
        respond(session)
    })
    .unwrap_or_else(|| Err(err_code(error_codes::NO_ACTIVE_MATCH, "no match in progress")))
}

fn map_engine_err(e: crate::error::EngineError) -> String {
    err_code(error_codes::ENGINE_REJECTED, e)
}

/// Start a new match, replacing any active one.
pub fn start_match_json(request_json: &str) -> Result<String, String> {
    let request: StartMatchRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, format!("invalid JSON request: {e}")))?;
    check_schema(request.schema_version)?;

    let initial = crate::engine::start_match(request.config, request.opening)
        .map_err(map_engine_err)?;

    let session = ScoringSession::new(initial);
    let body = {
        persist(session.state())?;
        respond(&session)?
    };
    state::set_session(session);
    Ok(body)
}

/// Score one delivery against the active match.
pub fn score_ball_json(request_json: &str) -> Result<String, String> {
    let request: ScoreBallRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, format!("invalid JSON request: {e}")))?;
    check_schema(request.schema_version)?;

    with_active_session(|session| {
        session.score_ball(request.event).map_err(map_engine_err)?;
        Ok(())
    })
}

/// Revert the most recent scoring action.
pub fn undo_json() -> Result<String, String> {
    with_active_session(|session| {
        if !session.undo() {
            return Err(err_code(error_codes::ENGINE_REJECTED, "nothing to undo"));
        }
        Ok(())
    })
}

pub fn new_batter_json(request_json: &str) -> Result<String, String> {
    let request: NewBatterRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, format!("invalid JSON request: {e}")))?;
    check_schema(request.schema_version)?;

    with_active_session(|session| {
        session.resolve_new_batter(&request.name).map_err(map_engine_err)?;
        Ok(())
    })
}

pub fn new_bowler_json(request_json: &str) -> Result<String, String> {
    let request: NewBowlerRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, format!("invalid JSON request: {e}")))?;
    check_schema(request.schema_version)?;

    let pick = match (request.existing_index, request.name) {
        (Some(index), _) => BowlerPick::Existing(index),
        (None, Some(name)) => BowlerPick::New(name),
        (None, None) => {
            return Err(err_code(
                error_codes::BAD_REQUEST,
                "either existing_index or name is required",
            ))
        }
    };

    with_active_session(|session| {
        session.resolve_new_bowler(pick).map_err(map_engine_err)?;
        Ok(())
    })
}

/// Hand the innings over and start the chase.
pub fn second_innings_json(request_json: &str) -> Result<String, String> {
    let request: SecondInningsRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, format!("invalid JSON request: {e}")))?;
    check_schema(request.schema_version)?;

    with_active_session(|session| {
        session.begin_second_innings(request.opening).map_err(map_engine_err)?;
        Ok(())
    })
}

/// Reopen the persisted in-progress match, if there is one. The resumed
/// session starts with an empty undo history.
pub fn resume_match_json() -> Result<String, String> {
    let state = STORE
        .load_active()
        .ok_or_else(|| err_code(error_codes::NO_ACTIVE_MATCH, "no saved match to resume"))?;

    log::info!("resuming match {}", state.id);
    let session = ScoringSession::new(state);
    let body = respond(&session)?;
    state::set_session(session);
    Ok(body)
}

/// Snapshot of the live situation for an analysis backend.
pub fn match_brief_json() -> Result<String, String> {
    state::with_session(|session| {
        let brief = MatchBrief::from_state(session.state());
        serde_json::to_string(&brief).map_err(|e| err_code(error_codes::BAD_REQUEST, e))
    })
    .unwrap_or_else(|| Err(err_code(error_codes::NO_ACTIVE_MATCH, "no match in progress")))
}

/// Archived matches, most recent first.
pub fn history_json() -> Result<String, String> {
    let history = STORE
        .load_history()
        .map_err(|e| err_code(error_codes::PERSISTENCE_FAILED, e))?;

    let summaries: Vec<MatchSummary> = history
        .iter()
        .map(|m| MatchSummary {
            id: m.id.clone(),
            date: m.date.clone(),
            title: format!("{} vs {}", m.config.team_a, m.config.team_b),
            result: m.win_margin.clone().unwrap_or_else(|| "In progress".to_string()),
        })
        .collect();

    serde_json::to_string(&summaries).map_err(|e| err_code(error_codes::BAD_REQUEST, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pending;
    use crate::test_support::api_guard;

    fn start_request() -> String {
        serde_json::json!({
            "schema_version": 1,
            "config": {
                "team_a": "India",
                "team_b": "Australia",
                "total_overs": 2,
                "toss_winner": "India",
                "elected_to": "bat",
            },
            "opening": {
                "striker": "Rohit",
                "non_striker": "Gill",
                "bowler": "Starc",
            },
        })
        .to_string()
    }

    fn score(event: serde_json::Value) -> Result<String, String> {
        score_ball_json(
            &serde_json::json!({"schema_version": 1, "event": event}).to_string(),
        )
    }

    fn parse(body: &str) -> MatchResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_start_and_score_roundtrip() {
        let _guard = api_guard();

        let body = start_match_json(&start_request()).unwrap();
        let response = parse(&body);
        assert_eq!(response.schema_version, 1);
        assert_eq!(response.undo_depth, 0);
        assert_eq!(response.state.batting_team.name, "India");

        let body = score(serde_json::json!({"kind": "runs", "value": 4})).unwrap();
        let response = parse(&body);
        assert_eq!(response.state.batting_team.score, 4);
        assert_eq!(response.undo_depth, 1);
    }

    #[test]
    fn test_schema_version_rejected() {
        let _guard = api_guard();

        let mut request: serde_json::Value = serde_json::from_str(&start_request()).unwrap();
        request["schema_version"] = serde_json::json!(9);
        let err = start_match_json(&request.to_string()).unwrap_err();
        assert!(err.starts_with(error_codes::UNSUPPORTED_SCHEMA_VERSION));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let _guard = api_guard();
        let err = start_match_json("{not json").unwrap_err();
        assert!(err.starts_with(error_codes::BAD_REQUEST));
    }

    #[test]
    fn test_no_active_match() {
        let _guard = api_guard();
        crate::state::clear_session();

        let err = score(serde_json::json!({"kind": "wicket"})).unwrap_err();
        assert!(err.starts_with(error_codes::NO_ACTIVE_MATCH));
        let err = undo_json().unwrap_err();
        assert!(err.starts_with(error_codes::NO_ACTIVE_MATCH));
        let err = match_brief_json().unwrap_err();
        assert!(err.starts_with(error_codes::NO_ACTIVE_MATCH));
    }

    #[test]
    fn test_engine_rejection_surfaces_code() {
        let _guard = api_guard();
        start_match_json(&start_request()).unwrap();

        score(serde_json::json!({"kind": "wicket"})).unwrap();
        let err = score(serde_json::json!({"kind": "runs", "value": 1})).unwrap_err();
        assert!(err.starts_with(error_codes::ENGINE_REJECTED));

        let body =
            new_batter_json(&serde_json::json!({"schema_version": 1, "name": "Kohli"}).to_string())
                .unwrap();
        assert_eq!(parse(&body).state.pending, Pending::None);
    }

    #[test]
    fn test_new_bowler_request_needs_a_pick() {
        let _guard = api_guard();
        let err = new_bowler_json(&serde_json::json!({"schema_version": 1}).to_string())
            .unwrap_err();
        assert!(err.starts_with(error_codes::BAD_REQUEST));
    }

    #[test]
    fn test_undo_reverts_and_reports_depth() {
        let _guard = api_guard();
        start_match_json(&start_request()).unwrap();

        score(serde_json::json!({"kind": "runs", "value": 6})).unwrap();
        let body = undo_json().unwrap();
        let response = parse(&body);
        assert_eq!(response.state.batting_team.score, 0);
        assert_eq!(response.undo_depth, 0);

        let err = undo_json().unwrap_err();
        assert!(err.starts_with(error_codes::ENGINE_REJECTED));
    }

    #[test]
    fn test_resume_restores_saved_match() {
        let _guard = api_guard();

        start_match_json(&start_request()).unwrap();
        score(serde_json::json!({"kind": "runs", "value": 2})).unwrap();

        // Simulate an app restart.
        crate::state::clear_session();

        let body = resume_match_json().unwrap();
        let response = parse(&body);
        assert_eq!(response.state.batting_team.score, 2);
        assert_eq!(response.undo_depth, 0);
        assert!(crate::state::has_session());
    }
}

pub mod json_api;

pub use json_api::{
    history_json, match_brief_json, new_batter_json, new_bowler_json, resume_match_json,
    score_ball_json, second_innings_json, start_match_json, undo_json, MatchResponse,
    MatchSummary, NewBatterRequest, NewBowlerRequest, ScoreBallRequest, SecondInningsRequest,
    StartMatchRequest,
};

/// Stable error-code prefixes surfaced to embedders.
pub mod error_codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const UNSUPPORTED_SCHEMA_VERSION: &str = "UNSUPPORTED_SCHEMA_VERSION";
    pub const NO_ACTIVE_MATCH: &str = "NO_ACTIVE_MATCH";
    pub const ENGINE_REJECTED: &str = "ENGINE_REJECTED";
    pub const PERSISTENCE_FAILED: &str = "PERSISTENCE_FAILED";
}

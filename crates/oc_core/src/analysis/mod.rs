//! Match analysis contract.
//!
//! The engine never talks to a model provider itself. Embedders implement
//! [`AnalysisService`] against whatever backend they have and the engine
//! hands them a [`MatchBrief`], a compact snapshot of the live situation.
//! When the service fails the caller gets a neutral fallback report so the
//! scoring flow is never blocked on analysis.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::stats;
use crate::models::{Innings, MatchState};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analysis unavailable: {0}")]
    Unavailable(String),
}

/// Structured output every analysis backend must produce.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub commentary: String,

    /// Win probability for the batting team, 0 to 100.
    pub win_probability: f32,

    pub tactical_advice: String,
}

impl AnalysisReport {
    /// Neutral report used whenever the backend fails.
    pub fn fallback() -> Self {
        Self {
            commentary: "Live analysis is unavailable. Reconnecting...".to_string(),
            win_probability: 50.0,
            tactical_advice: "Maintain wicket preservation while rotating strike.".to_string(),
        }
    }
}

pub trait AnalysisService {
    fn analyze(&self, brief: &MatchBrief) -> Result<AnalysisReport, AnalysisError>;
}

/// Run the service and degrade to the fallback on failure. Probabilities
/// from the backend are clamped into range.
pub fn analyze_or_fallback(service: &dyn AnalysisService, state: &MatchState) -> AnalysisReport {
    let brief = MatchBrief::from_state(state);
    match service.analyze(&brief) {
        Ok(mut report) => {
            report.win_probability = report.win_probability.clamp(0.0, 100.0);
            report
        }
        Err(err) => {
            log::warn!("analysis service failed, using fallback: {err}");
            AnalysisReport::fallback()
        }
    }
}

/// The live-match facts an analysis backend needs.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MatchBrief {
    /// "142/3" style score line for the batting side.
    pub score_line: String,

    /// Overs played in the current innings, "12.4" style.
    pub overs: String,

    pub run_rate: String,

    /// Chase target, second innings only.
    pub target: Option<u32>,

    pub second_innings: bool,

    /// "Rohit 34 (21)" for each batter at the crease.
    pub striker: String,
    pub non_striker: String,

    /// "Starc 2.1-0-18-1" for the active bowler.
    pub bowler: String,

    /// Tokens bowled so far in the current over.
    pub this_over: Vec<String>,
}

impl MatchBrief {
    pub fn from_state(state: &MatchState) -> Self {
        let team = &state.batting_team;

        Self {
            score_line: format!("{}/{}", team.score, team.wickets),
            overs: team.overs_played.to_string(),
            run_rate: stats::run_rate_display(team.score, team.overs_played.total_balls()),
            target: state.target,
            second_innings: state.innings == Innings::Second,
            striker: state.current_striker().batting_line(),
            non_striker: state.current_non_striker().batting_line(),
            bowler: state.current_bowler().bowling_line(),
            this_over: state.this_over.clone(),
        }
    }
}

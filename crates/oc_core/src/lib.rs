//! # oc_core - Ball-by-ball cricket scorekeeping engine
//!
//! This library keeps a limited-overs cricket match as a strict state
//! machine: every ball, wicket, and extra flows through one processor,
//! the full snapshot is undoable, completed matches are archived to disk,
//! and a JSON API exposes the whole surface for non-Rust embedders.
//!
//! ## Features
//! - Pure ball-event transitions over an immutable input snapshot
//! - Bounded undo history that restores exact prior snapshots
//! - MessagePack + LZ4 persistence with integrity checks
//! - JSON API for easy integration

pub mod analysis;
pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;
pub mod state;

// Re-export main API functions
pub use api::{
    history_json, match_brief_json, new_batter_json, new_bowler_json, resume_match_json,
    score_ball_json, second_innings_json, start_match_json, undo_json, MatchResponse,
};
pub use error::{EngineError, Result};

// Re-export core model types
pub use models::{
    BallEvent, Innings, MatchConfig, MatchState, MatchStatus, OpeningPlayers, Pending, PlayerStat,
    Team, TossDecision,
};

// Re-export engine entry points
pub use engine::{
    apply_event, begin_second_innings, resolve_new_batter, resolve_new_bowler, start_match,
    BowlerPick, UndoStack,
};

// Re-export save system
pub use save::{SaveError, SaveStore};

// Re-export state management
pub use state::{clear_session, has_session, set_session, with_session, ScoringSession};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

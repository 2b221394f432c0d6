//! Active scoring session management.
//!
//! A `ScoringSession` bundles the live snapshot with its undo stack and is
//! the single-writer editing surface: one scorer, one causal stream of ball
//! events. The module also hosts a thread-safe global slot for the session
//! so embedders (the JSON api, the CLI) can share one active match.

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::engine::{self, BowlerPick, UndoStack};
use crate::error::Result;
use crate::models::{BallEvent, MatchState, OpeningPlayers};

/// Global active-session singleton.
pub static ACTIVE_SESSION: Lazy<Arc<RwLock<Option<ScoringSession>>>> =
    Lazy::new(|| Arc::new(RwLock::new(None)));

/// The live match plus its undo history.
#[derive(Debug, Clone)]
pub struct ScoringSession {
    state: MatchState,
    undo: UndoStack,
}

impl ScoringSession {
    /// Wrap a snapshot (fresh from `start_match` or loaded from the save
    /// store) with an empty undo history.
    pub fn new(state: MatchState) -> Self {
        Self { state, undo: UndoStack::new() }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Score one ball. On success the pre-event snapshot goes onto the undo
    /// stack; on error nothing changes.
    pub fn score_ball(&mut self, event: BallEvent) -> Result<&MatchState> {
        let next = engine::apply_event(&self.state, event)?;
        self.commit(next);
        Ok(&self.state)
    }

    pub fn resolve_new_batter(&mut self, name: &str) -> Result<&MatchState> {
        let next = engine::resolve_new_batter(&self.state, name)?;
        self.commit(next);
        Ok(&self.state)
    }

    pub fn resolve_new_bowler(&mut self, pick: BowlerPick) -> Result<&MatchState> {
        let next = engine::resolve_new_bowler(&self.state, pick)?;
        self.commit(next);
        Ok(&self.state)
    }

    pub fn begin_second_innings(&mut self, opening: OpeningPlayers) -> Result<&MatchState> {
        let next = engine::begin_second_innings(&self.state, opening)?;
        self.commit(next);
        Ok(&self.state)
    }

    /// Restore the most recent prior snapshot verbatim, pending side
    /// request included. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(prev) => {
                self.state = prev;
                true
            }
            None => {
                log::debug!("nothing to undo");
                false
            }
        }
    }

    fn commit(&mut self, next: MatchState) {
        let prev = std::mem::replace(&mut self.state, next);
        self.undo.push(prev);
    }
}

// ========================
// Global session access
// ========================

/// Install a session as the active one, replacing any previous session.
pub fn set_session(session: ScoringSession) {
    *ACTIVE_SESSION.write().expect("ACTIVE_SESSION lock poisoned") = Some(session);
}

/// Drop the active session, if any.
pub fn clear_session() {
    *ACTIVE_SESSION.write().expect("ACTIVE_SESSION lock poisoned") = None;
}

pub fn has_session() -> bool {
    ACTIVE_SESSION.read().expect("ACTIVE_SESSION lock poisoned").is_some()
}

/// Run a closure against the active session; `None` when no match is open.
pub fn with_session<T>(f: impl FnOnce(&mut ScoringSession) -> T) -> Option<T> {
    let mut guard = ACTIVE_SESSION.write().expect("ACTIVE_SESSION lock poisoned");
    guard.as_mut().map(f)
}

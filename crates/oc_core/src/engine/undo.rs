use std::collections::VecDeque;

use crate::models::MatchState;

/// Snapshots retained for undo before the oldest is evicted.
pub const UNDO_CAPACITY: usize = 50;

/// Bounded last-in-first-out stack of prior match snapshots.
///
/// Because `apply_event` returns a new value instead of mutating, undo is
/// just "keep the previous value": every mutating session operation pushes
/// the pre-operation snapshot, and popping restores it verbatim, pending
/// side-request tag included.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    entries: VecDeque<MatchState>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: MatchState) {
        if self.entries.len() == UNDO_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<MatchState> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::start_match;
    use crate::models::{MatchConfig, OpeningPlayers, TossDecision};

    fn snapshot(tag: u32) -> MatchState {
        let config = MatchConfig {
            team_a: "India".to_string(),
            team_b: "Australia".to_string(),
            total_overs: 20,
            toss_winner: "India".to_string(),
            elected_to: TossDecision::Bat,
        };
        let opening = OpeningPlayers {
            striker: "Rohit".to_string(),
            non_striker: "Gill".to_string(),
            bowler: "Starc".to_string(),
        };
        let mut state = start_match(config, opening).unwrap();
        state.batting_team.score = tag;
        state
    }

    #[test]
    fn test_lifo_order() {
        let mut stack = UndoStack::new();
        stack.push(snapshot(1));
        stack.push(snapshot(2));

        assert_eq!(stack.pop().unwrap().batting_team.score, 2);
        assert_eq!(stack.pop().unwrap().batting_team.score, 1);
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut stack = UndoStack::new();
        for i in 0..(UNDO_CAPACITY as u32 + 5) {
            stack.push(snapshot(i));
        }
        assert_eq!(stack.len(), UNDO_CAPACITY);

        // Newest first on the way out; the first five snapshots are gone.
        let mut last = None;
        while let Some(s) = stack.pop() {
            last = Some(s.batting_team.score);
        }
        assert_eq!(last, Some(5));
    }
}

use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::error::SaveError;
use super::format::{decompress_and_deserialize, serialize_and_compress, SaveEnvelope};
use crate::models::{MatchState, MatchStatus};

const ACTIVE_FILE: &str = "active_match.dat";
const HISTORY_FILE: &str = "match_history.dat";

/// Filesystem-backed persistence for the scorekeeping engine.
///
/// Two files live under the store directory: the in-progress match (one
/// `MatchState`, overwritten after every ball) and the completed-match
/// archive (most recent first). Writes are atomic via temp file + rename.
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store directory for embedders that do not pick their own.
    /// `OC_SAVE_DIR` overrides the default `./saves`.
    pub fn default_location() -> Self {
        let dir = std::env::var_os("OC_SAVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("saves")
            });
        Self::new(dir)
    }

    // ========================
    // Active match
    // ========================

    pub fn save_active(&self, state: &MatchState) -> Result<(), SaveError> {
        let envelope = SaveEnvelope::new(state.clone());
        self.write_atomic(&self.active_path(), &serialize_and_compress(&envelope)?)?;
        log::debug!("saved active match {}", state.id);
        Ok(())
    }

    /// Load the in-progress match if one exists. Unreadable data is
    /// treated as no saved match rather than an error; a corrupt file
    /// must not block starting a new game.
    pub fn load_active(&self) -> Option<MatchState> {
        let path = self.active_path();
        if !path.exists() {
            return None;
        }
        match self.read_envelope::<MatchState>(&path) {
            Ok(envelope) => Some(envelope.payload),
            Err(err) => {
                log::warn!("discarding unreadable active match save: {err}");
                None
            }
        }
    }

    pub fn clear_active(&self) -> Result<(), SaveError> {
        let path = self.active_path();
        if path.exists() {
            remove_file(&path)?;
        }
        Ok(())
    }

    // ========================
    // Completed-match archive
    // ========================

    /// Archive a completed match at the front of the history, replacing
    /// any earlier entry with the same id.
    pub fn append_to_history(&self, state: &MatchState) -> Result<(), SaveError> {
        if state.status != MatchStatus::Completed {
            log::warn!("archiving match {} while still live", state.id);
        }

        let mut history = self.load_history()?;
        history.retain(|m| m.id != state.id);
        history.insert(0, state.clone());

        let envelope = SaveEnvelope::new(history);
        self.write_atomic(&self.history_path(), &serialize_and_compress(&envelope)?)?;
        log::info!("archived match {}", state.id);
        Ok(())
    }

    /// All archived matches, most recent first. A missing file is an
    /// empty history.
    pub fn load_history(&self) -> Result<Vec<MatchState>, SaveError> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let envelope = self.read_envelope::<Vec<MatchState>>(&path)?;
        Ok(envelope.payload)
    }

    /// Remove one archived match by id. Returns whether anything was
    /// removed.
    pub fn remove_from_history(&self, id: &str) -> Result<bool, SaveError> {
        let mut history = self.load_history()?;
        let before = history.len();
        history.retain(|m| m.id != id);
        if history.len() == before {
            return Ok(false);
        }

        let envelope = SaveEnvelope::new(history);
        self.write_atomic(&self.history_path(), &serialize_and_compress(&envelope)?)?;
        Ok(true)
    }

    pub fn clear_history(&self) -> Result<(), SaveError> {
        let path = self.history_path();
        if path.exists() {
            remove_file(&path)?;
        }
        Ok(())
    }

    // Private helpers

    fn active_path(&self) -> PathBuf {
        self.dir.join(ACTIVE_FILE)
    }

    fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.flush()?;

            // sync_all ensures data is written to disk (portable fsync)
            file.sync_all()?;
        }

        rename(&temp_path, path)?;

        log::debug!("saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn read_envelope<T: serde::de::DeserializeOwned>(
        &self,
        path: &Path,
    ) -> Result<SaveEnvelope<T>, SaveError> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        decompress_and_deserialize(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::start_match;
    use crate::models::{MatchConfig, OpeningPlayers, TossDecision};
    use tempfile::TempDir;

    fn sample_state() -> MatchState {
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
        start_match(config, opening).unwrap()
    }

    #[test]
    fn test_active_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = SaveStore::new(temp_dir.path());

        assert!(store.load_active().is_none());

        let state = sample_state();
        store.save_active(&state).unwrap();

        let loaded = store.load_active().unwrap();
        assert_eq!(loaded, state);

        store.clear_active().unwrap();
        assert!(store.load_active().is_none());
    }

    #[test]
    fn test_corrupt_active_file_treated_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = SaveStore::new(temp_dir.path());

        let state = sample_state();
        store.save_active(&state).unwrap();

        // Flip a byte so the checksum fails.
        let path = temp_dir.path().join(ACTIVE_FILE);
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[8] = bytes[8].wrapping_add(1);
        std::fs::write(&path, bytes).unwrap();

        assert!(store.load_active().is_none());
    }

    #[test]
    fn test_history_most_recent_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = SaveStore::new(temp_dir.path());

        let first = sample_state();
        let second = sample_state();
        store.append_to_history(&first).unwrap();
        store.append_to_history(&second).unwrap();

        let history = store.load_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
    }

    #[test]
    fn test_history_replaces_entry_with_same_id() {
        let temp_dir = TempDir::new().unwrap();
        let store = SaveStore::new(temp_dir.path());

        let mut state = sample_state();
        store.append_to_history(&state).unwrap();

        state.batting_team.score = 99;
        state.batting_team.extras = 99;
        store.append_to_history(&state).unwrap();

        let history = store.load_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].batting_team.score, 99);
    }

    #[test]
    fn test_remove_from_history() {
        let temp_dir = TempDir::new().unwrap();
        let store = SaveStore::new(temp_dir.path());

        let keep = sample_state();
        let drop = sample_state();
        store.append_to_history(&keep).unwrap();
        store.append_to_history(&drop).unwrap();

        assert!(store.remove_from_history(&drop.id).unwrap());
        assert!(!store.remove_from_history(&drop.id).unwrap());

        let history = store.load_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, keep.id);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = SaveStore::new(temp_dir.path());

        store.save_active(&sample_state()).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use super::error::SaveError;
use super::SAVE_VERSION;

/// On-disk wrapper around any persisted payload. The active-match file
/// carries a `MatchState`, the archive file a `Vec<MatchState>`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SaveEnvelope<T> {
    /// Save format version for forward-compatibility checks.
    pub version: u32,

    /// Write timestamp (unix milliseconds).
    pub timestamp: u64,

    pub payload: T,
}

impl<T> SaveEnvelope<T> {
    pub fn new(payload: T) -> Self {
        Self { version: SAVE_VERSION, timestamp: current_timestamp(), payload }
    }
}

/// Serialize and compress a payload for disk.
///
/// Layout: lz4(msgpack(envelope)) followed by a 32-byte SHA256 checksum of
/// the compressed bytes.
pub fn serialize_and_compress<T: Serialize>(envelope: &SaveEnvelope<T>) -> Result<Vec<u8>, SaveError> {
    // 1. Serialize to MessagePack with field names
    let msgpack = to_vec_named(envelope).map_err(SaveError::Serialization)?;

    // 2. Compress with LZ4 (size prepended for easy decompression)
    let compressed = compress_prepend_size(&msgpack);

    // 3. Add SHA256 checksum at the end
    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Decompress and deserialize a payload read from disk.
pub fn decompress_and_deserialize<T: DeserializeOwned>(
    bytes: &[u8],
) -> Result<SaveEnvelope<T>, SaveError> {
    // Minimum size: lz4 size header + checksum
    if bytes.len() < 4 + 32 {
        return Err(SaveError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated_checksum = hasher.finalize();

    if &calculated_checksum[..] != checksum_bytes {
        return Err(SaveError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;

    let envelope: SaveEnvelope<T> = from_slice(&msgpack).map_err(SaveError::Deserialization)?;

    if envelope.version > SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            found: envelope.version,
            expected: SAVE_VERSION,
        });
    }

    Ok(envelope)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::start_match;
    use crate::models::{MatchConfig, MatchState, OpeningPlayers, TossDecision};

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
    fn test_serialize_deserialize_roundtrip() {
        let envelope = SaveEnvelope::new(sample_state());

        let serialized = serialize_and_compress(&envelope).unwrap();
        let deserialized: SaveEnvelope<MatchState> =
            decompress_and_deserialize(&serialized).unwrap();

        assert_eq!(deserialized.version, SAVE_VERSION);
        assert_eq!(deserialized.payload, envelope.payload);
    }

    #[test]
    fn test_checksum_validation() {
        let envelope = SaveEnvelope::new(sample_state());
        let mut serialized = serialize_and_compress(&envelope).unwrap();

        // Corrupt the checksum
        if let Some(last) = serialized.last_mut() {
            *last = last.wrapping_add(1);
        }

        let result: Result<SaveEnvelope<MatchState>, _> =
            decompress_and_deserialize(&serialized);
        assert!(matches!(result, Err(SaveError::ChecksumMismatch)));
    }

    #[test]
    fn test_payload_corruption_detected() {
        let envelope = SaveEnvelope::new(sample_state());
        let mut serialized = serialize_and_compress(&envelope).unwrap();

        // Flip a byte in the compressed payload; the checksum no longer
        // matches even though the file length is unchanged.
        serialized[10] = serialized[10].wrapping_add(1);

        let result: Result<SaveEnvelope<MatchState>, _> =
            decompress_and_deserialize(&serialized);
        assert!(matches!(result, Err(SaveError::ChecksumMismatch)));
    }

    #[test]
    fn test_truncated_input_rejected() {
        let result: Result<SaveEnvelope<MatchState>, _> =
            decompress_and_deserialize(&[0u8; 12]);
        assert!(matches!(result, Err(SaveError::Corrupted)));
    }

    #[test]
    fn test_future_version_rejected() {
        let mut envelope = SaveEnvelope::new(sample_state());
        envelope.version = SAVE_VERSION + 1;

        let serialized = serialize_and_compress(&envelope).unwrap();
        let result: Result<SaveEnvelope<MatchState>, _> =
            decompress_and_deserialize(&serialized);
        assert!(matches!(
            result,
            Err(SaveError::VersionMismatch { found, expected })
                if found == SAVE_VERSION + 1 && expected == SAVE_VERSION
        ));
    }
}

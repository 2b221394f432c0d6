// Save/Load system for the scorekeeping engine
// MessagePack + LZ4 compression with versioning and integrity checks

pub mod error;
pub mod format;
pub mod store;

pub use error::SaveError;
pub use format::{decompress_and_deserialize, serialize_and_compress, SaveEnvelope};
pub use store::SaveStore;

pub const SAVE_VERSION: u32 = 1;

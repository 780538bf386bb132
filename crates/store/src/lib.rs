//! Persistence for waitwise: settings, lifetime progress and the difficulty
//! controller snapshot, stored as JSON blobs behind a key-value trait with
//! in-memory and single-file backends.

pub mod errors;
pub mod kv;
pub mod progress;
pub mod settings;
pub mod storage;

pub use errors::StoreError;
pub use kv::{JsonFileStore, KvStore, MemoryStore};
pub use progress::{KindStats, Progress};
pub use settings::{DifficultyMode, Settings};
pub use storage::{PuzzleSession, Storage};

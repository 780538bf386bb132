//! Typed access over the key-value backend. Corrupt or missing blobs fall
//! back to defaults with a warning rather than failing the session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use waitwise_core_types::{PuzzleId, PuzzleKind};
use waitwise_difficulty::DifficultySnapshot;

use crate::errors::StoreError;
use crate::kv::KvStore;
use crate::progress::Progress;
use crate::settings::Settings;

const KEY_SETTINGS: &str = "waitwise_settings";
const KEY_PROGRESS: &str = "waitwise_progress";
const KEY_SESSION: &str = "waitwise_session";
const KEY_DIFFICULTY: &str = "waitwise_difficulty";

/// The puzzle currently in front of the user. Persisted so an interrupted
/// session can be detected (and reported as abandoned) on the next open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSession {
    pub id: PuzzleId,
    pub kind: PuzzleKind,
    pub started_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Storage {
    kv: Arc<dyn KvStore>,
}

impl Storage {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn load_settings(&self) -> Result<Settings, StoreError> {
        self.load_or_default(KEY_SETTINGS).await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.save(KEY_SETTINGS, settings).await
    }

    pub async fn load_progress(&self) -> Result<Progress, StoreError> {
        self.load_or_default(KEY_PROGRESS).await
    }

    pub async fn save_progress(&self, progress: &Progress) -> Result<(), StoreError> {
        self.save(KEY_PROGRESS, progress).await
    }

    /// `None` when no puzzle is open (or the blob is corrupt).
    pub async fn load_session(&self) -> Result<Option<PuzzleSession>, StoreError> {
        let Some(value) = self.kv.get(KEY_SESSION).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(target: "store.typed", key = KEY_SESSION, %err, "blob corrupt, ignoring");
                Ok(None)
            }
        }
    }

    pub async fn save_session(&self, session: &PuzzleSession) -> Result<(), StoreError> {
        self.save(KEY_SESSION, session).await
    }

    pub async fn clear_session(&self) -> Result<(), StoreError> {
        self.kv.remove(KEY_SESSION).await
    }

    /// `None` means no snapshot has been saved yet; the caller starts the
    /// controller fresh.
    pub async fn load_difficulty(&self) -> Result<Option<DifficultySnapshot>, StoreError> {
        let Some(value) = self.kv.get(KEY_DIFFICULTY).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(err) => {
                warn!(target: "store.typed", key = KEY_DIFFICULTY, %err, "blob corrupt, ignoring");
                Ok(None)
            }
        }
    }

    pub async fn save_difficulty(&self, snapshot: &DifficultySnapshot) -> Result<(), StoreError> {
        self.save(KEY_DIFFICULTY, snapshot).await
    }

    /// Drop all persisted state.
    pub async fn reset(&self) -> Result<(), StoreError> {
        for key in [KEY_SETTINGS, KEY_PROGRESS, KEY_SESSION, KEY_DIFFICULTY] {
            self.kv.remove(key).await?;
        }
        Ok(())
    }

    async fn load_or_default<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let Some(value) = self.kv.get(key).await? else {
            return Ok(T::default());
        };
        match serde_json::from_value(value) {
            Ok(parsed) => Ok(parsed),
            Err(err) => {
                warn!(target: "store.typed", key, %err, "blob corrupt, using defaults");
                Ok(T::default())
            }
        }
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.kv.set(key, serde_json::to_value(value)?).await
    }
}

//! JSON file persistence
//!
//! Versioned, atomically-written JSON state files. The session store is the
//! only consumer today; the envelope carries a schema version so the file
//! format can evolve without silently misreading old data.

use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Persistence error types
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// State accessed before `init`
    #[error("State not initialized")]
    NotInitialized,

    /// On-disk schema version differs from the expected one
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Found version
        found: u32,
    },
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Versioned state envelope written to disk
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
struct VersionedState<T> {
    version: u32,
    data: T,
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Path to the persistence file
    pub path: PathBuf,
    /// Current schema version
    pub version: u32,
    /// Write via temp file + rename
    pub atomic_writes: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("state.json"),
            version: 1,
            atomic_writes: true,
        }
    }
}

impl PersistenceConfig {
    /// Create a new configuration for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the schema version
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Enable or disable atomic writes
    pub fn atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }
}

/// Persisted state manager
///
/// Holds an in-memory copy of `T` and writes it through to disk on every
/// change. A missing file initializes to `T::default()`.
pub struct PersistedState<T> {
    config: PersistenceConfig,
    state: Arc<RwLock<Option<T>>>,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned + Clone + Default,
{
    /// Create a new persisted state manager
    pub fn new(config: PersistenceConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(None)),
        }
    }

    /// Initialize by loading from disk, falling back to the default state
    /// when the file does not exist yet
    pub async fn init(&self) -> Result<()> {
        match self.load_from_disk().await {
            Ok(data) => {
                let mut state = self.state.write().await;
                *state = Some(data);
                Ok(())
            }
            Err(PersistenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut state = self.state.write().await;
                *state = Some(T::default());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Get a clone of the current state
    pub async fn get(&self) -> Result<T> {
        let state = self.state.read().await;
        state.clone().ok_or(PersistenceError::NotInitialized)
    }

    /// Replace the state and persist it
    pub async fn set(&self, new_state: T) -> Result<()> {
        let mut state = self.state.write().await;
        *state = Some(new_state.clone());
        self.write_to_disk(&new_state).await
    }

    /// Reset to the default state and delete the file
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().await;
        *state = Some(T::default());

        match fs::remove_file(&self.config.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn load_from_disk(&self) -> Result<T> {
        let contents = fs::read_to_string(&self.config.path).await?;
        let versioned: VersionedState<T> = serde_json::from_str(&contents)?;

        if versioned.version != self.config.version {
            return Err(PersistenceError::VersionMismatch {
                expected: self.config.version,
                found: versioned.version,
            });
        }

        Ok(versioned.data)
    }

    async fn write_to_disk(&self, data: &T) -> Result<()> {
        let versioned = VersionedState {
            version: self.config.version,
            data: data.clone(),
        };
        let json = serde_json::to_string_pretty(&versioned)?;

        if self.config.atomic_writes {
            self.write_atomic(&json).await
        } else {
            fs::write(&self.config.path, json).await?;
            Ok(())
        }
    }

    async fn write_atomic(&self, contents: &str) -> Result<()> {
        let temp_path = self.config.path.with_extension("tmp");

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(contents.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.config.path).await?;
        Ok(())
    }
}

impl<T> Clone for PersistedState<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct TestState {
        counter: u32,
        label: String,
    }

    #[tokio::test]
    async fn test_init_missing_file_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = PersistenceConfig::new(temp_dir.path().join("state.json"));

        let state = PersistedState::<TestState>::new(config);
        state.init().await.unwrap();

        assert_eq!(state.get().await.unwrap(), TestState::default());
    }

    #[tokio::test]
    async fn test_get_before_init_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = PersistenceConfig::new(temp_dir.path().join("state.json"));

        let state = PersistedState::<TestState>::new(config);
        assert!(matches!(
            state.get().await,
            Err(PersistenceError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_set_then_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        {
            let state = PersistedState::<TestState>::new(PersistenceConfig::new(&path));
            state.init().await.unwrap();
            state
                .set(TestState {
                    counter: 7,
                    label: "persisted".to_string(),
                })
                .await
                .unwrap();
        }

        let reloaded = PersistedState::<TestState>::new(PersistenceConfig::new(&path));
        reloaded.init().await.unwrap();

        let loaded = reloaded.get().await.unwrap();
        assert_eq!(loaded.counter, 7);
        assert_eq!(loaded.label, "persisted");
    }

    #[tokio::test]
    async fn test_version_mismatch_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        {
            let config = PersistenceConfig::new(&path).version(1);
            let state = PersistedState::<TestState>::new(config);
            state.init().await.unwrap();
            state.set(TestState::default()).await.unwrap();
        }

        let config = PersistenceConfig::new(&path).version(2);
        let state = PersistedState::<TestState>::new(config);
        let result = state.init().await;

        assert!(matches!(
            result,
            Err(PersistenceError::VersionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        let state = PersistedState::<TestState>::new(PersistenceConfig::new(&path));
        state.init().await.unwrap();
        state
            .set(TestState {
                counter: 1,
                label: "x".to_string(),
            })
            .await
            .unwrap();
        assert!(path.exists());

        state.clear().await.unwrap();
        assert!(!path.exists());
        assert_eq!(state.get().await.unwrap(), TestState::default());
    }
}

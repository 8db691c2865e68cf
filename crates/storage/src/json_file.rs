use async_trait::async_trait;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::repository::{PreferenceKey, PreferenceStore, StorageError};

/// Preference store backed by a single JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write never leaves a truncated preference file behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or create) the store at the given path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an existing file cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Serialization(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Platform-appropriate default location of the preference file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "quiz")
            .map(|dirs| dirs.data_local_dir().join("preferences.json"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(values)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }
}

#[async_trait]
impl PreferenceStore for JsonFileStore {
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().await;
        Ok(values.get(key.as_str()).cloned())
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().await;
        values.insert(key.as_str().to_string(), value.to_string());
        self.persist(&values).await
    }

    async fn remove(&self, key: PreferenceKey) -> Result<(), StorageError> {
        let mut values = self.values.lock().await;
        values.remove(key.as_str());
        self.persist(&values).await
    }
}

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::ClientIdentity;

/// Errors surfaced by preference-store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The small set of process-wide values the quiz persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    /// The opaque identity assigned via `SET_CLIENT_ID`.
    ClientId,
    /// The host's chosen color theme (a hue shift value).
    Theme,
}

impl PreferenceKey {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::ClientId => "client_id",
            PreferenceKey::Theme => "theme",
        }
    }
}

/// Explicit key-value contract for the persisted client preferences.
///
/// Components read at construction and write only in response to an
/// explicit user action or a `SET_CLIENT_ID` event; there is no ambient
/// global access.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>, StorageError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn set(&self, key: PreferenceKey, value: &str) -> Result<(), StorageError>;

    /// Remove a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn remove(&self, key: PreferenceKey) -> Result<(), StorageError>;

    /// The persisted client identity, if one was ever assigned.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn client_identity(&self) -> Result<Option<ClientIdentity>, StorageError> {
        Ok(self
            .get(PreferenceKey::ClientId)
            .await?
            .and_then(ClientIdentity::new))
    }

    /// Persist the identity assigned by the service.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn set_client_identity(&self, identity: &ClientIdentity) -> Result<(), StorageError> {
        self.set(PreferenceKey::ClientId, identity.as_str()).await
    }
}

/// In-memory store for tests and hosts without persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<BTreeMap<&'static str, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryStore {
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Io("poisoned lock".to_string()))?;
        Ok(values.get(key.as_str()).cloned())
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Io("poisoned lock".to_string()))?;
        values.insert(key.as_str(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: PreferenceKey) -> Result<(), StorageError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Io("poisoned lock".to_string()))?;
        values.remove(key.as_str());
        Ok(())
    }
}

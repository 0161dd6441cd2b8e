//! Secure key-value storage for session credentials.
//!
//! [`SecureStore`] is the platform capability (keystore, keychain, or the bundled
//! SQLite adapter in [`crate::db`]). [`CredentialStore`] layers the three session
//! keys and their failure policy on top of it.

mod credentials;

pub use credentials::*;

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

/// Secure storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Secure storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Failed to read {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Failed to delete {key}: {reason}")]
    DeleteFailed { key: String, reason: String },
}

/// Durable storage for named scalar values.
///
/// `put` overwrites silently, `delete` is idempotent.
#[async_trait]
pub trait SecureStore: Send + Sync {
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySecureStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().expect("secure store lock poisoned")
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

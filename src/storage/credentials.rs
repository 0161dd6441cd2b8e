use std::sync::Arc;

use super::{SecureStore, StorageError};
use crate::models::Session;

pub const TOKEN_KEY: &str = "auth_token";
pub const ROLE_KEY: &str = "user_role";
pub const USER_ID_KEY: &str = "user_id";

/// Outcome of writing a full session record.
///
/// The token write is the only one whose failure aborts the operation. Role and
/// user id failures are logged and reported here, leaving a partial session.
/// A session without a role counts as `role_saved` once any stale role is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistReport {
    pub role_saved: bool,
    pub user_id_saved: bool,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.role_saved && self.user_id_saved
    }
}

/// The three session keys over a [`SecureStore`].
///
/// Reads never fail: storage errors are logged and reported as absence.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn SecureStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self { store }
    }

    // ============================================================
    // Token
    // ============================================================

    /// Save the auth token. Failures are surfaced: losing the token is not recoverable.
    pub async fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.put(TOKEN_KEY, token).await.map_err(|e| {
            tracing::error!("Error saving token: {}", e);
            e
        })
    }

    pub async fn get_token(&self) -> Option<String> {
        self.read(TOKEN_KEY).await
    }

    pub async fn remove_token(&self) {
        self.remove(TOKEN_KEY).await;
    }

    // ============================================================
    // Role
    // ============================================================

    pub async fn save_role(&self, role: &str) -> bool {
        self.write_absorbing(ROLE_KEY, role).await
    }

    pub async fn get_role(&self) -> Option<String> {
        self.read(ROLE_KEY).await
    }

    pub async fn remove_role(&self) {
        self.remove(ROLE_KEY).await;
    }

    // ============================================================
    // User id
    // ============================================================

    /// Save the user id as its decimal string form.
    pub async fn save_user_id(&self, user_id: i64) -> bool {
        self.write_absorbing(USER_ID_KEY, &user_id.to_string()).await
    }

    /// Read the user id. A stored value that is not an integer reads as absent.
    pub async fn get_user_id(&self) -> Option<i64> {
        let raw = self.read(USER_ID_KEY).await?;
        match raw.trim().parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Stored user id is not an integer, ignoring it");
                None
            }
        }
    }

    pub async fn remove_user_id(&self) {
        self.remove(USER_ID_KEY).await;
    }

    // ============================================================
    // Whole session
    // ============================================================

    /// Write token, role and user id in that order.
    ///
    /// Returns `Err` only when the token write fails, in which case nothing else
    /// is attempted. Without a role, the previously stored one is removed.
    pub async fn save_session(&self, session: &Session) -> Result<PersistReport, StorageError> {
        self.save_token(&session.token).await?;
        let role_saved = match &session.role {
            Some(role) => self.save_role(role).await,
            None => self.delete_absorbing(ROLE_KEY).await,
        };
        let user_id_saved = self.save_user_id(session.user_id).await;

        let report = PersistReport {
            role_saved,
            user_id_saved,
        };
        if !report.is_complete() {
            tracing::warn!(
                role_saved,
                user_id_saved,
                "Session stored partially; a fresh login will repair it"
            );
        }
        Ok(report)
    }

    /// Load the session if token and user id are both present. The role is optional.
    pub async fn load_session(&self) -> Option<Session> {
        let (token, role, user_id) =
            tokio::join!(self.get_token(), self.get_role(), self.get_user_id());
        Some(Session {
            token: token?,
            role,
            user_id: user_id?,
        })
    }

    /// Remove all three keys concurrently. Every deletion is attempted even if
    /// another fails; failures are only logged.
    pub async fn clear_all(&self) {
        tokio::join!(self.remove_token(), self.remove_role(), self.remove_user_id());
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Error reading {}: {}", key, e);
                None
            }
        }
    }

    async fn write_absorbing(&self, key: &str, value: &str) -> bool {
        match self.store.put(key, value).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error saving {}: {}", key, e);
                false
            }
        }
    }

    async fn remove(&self, key: &str) {
        self.delete_absorbing(key).await;
    }

    async fn delete_absorbing(&self, key: &str) -> bool {
        match self.store.delete(key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error removing {}: {}", key, e);
                false
            }
        }
    }
}

//! Session lifecycle.
//!
//! [`SessionManager`] performs the login and registration exchanges through
//! [`AuthClient`], persists the session through [`CredentialStore`], and answers
//! the identity queries used to gate the authenticated part of the app.
//!
//! ```text
//! Unauthenticated --login()--> Authenticating --ok--> Authenticated
//!        ^                          |                      |
//!        +--------- failure --------+                      |
//!        +------------------- logout() --------------------+
//! ```
//!
//! At boot the state is derived from storage alone: a stored, parseable user id
//! means `Authenticated`.

mod client;

pub use client::*;

use std::sync::Mutex;

use crate::models::*;
use crate::storage::CredentialStore;

pub struct SessionManager {
    client: AuthClient,
    credentials: CredentialStore,
    state: Mutex<SessionState>,
}

impl SessionManager {
    pub fn new(client: AuthClient, credentials: CredentialStore) -> Self {
        Self {
            client,
            credentials,
            state: Mutex::new(SessionState::Unauthenticated),
        }
    }

    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    /// Current in-process state.
    ///
    /// This tracks the last `login`, `logout` or `restore` call and can disagree
    /// with storage: a failed re-login reports `Unauthenticated` while the earlier
    /// stored session remains and [`is_authenticated`](Self::is_authenticated)
    /// still returns true. Call [`restore`](Self::restore) to resync.
    pub fn state(&self) -> SessionState {
        *self.state.lock().expect("session state lock poisoned")
    }

    fn set_state(&self, next: SessionState) {
        let mut state = self.state.lock().expect("session state lock poisoned");
        if *state != next {
            tracing::debug!("Session {} -> {}", state.as_str(), next.as_str());
        }
        *state = next;
    }

    /// Derive the state from storage. Called once at app boot.
    pub async fn restore(&self) -> SessionState {
        let next = if self.is_authenticated().await {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
        self.set_state(next);
        next
    }

    /// Sign in and persist the session.
    ///
    /// On any failure storage is left untouched, so a previously stored session
    /// survives. Overlapping calls are not coordinated; the last write wins.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        self.set_state(SessionState::Authenticating);

        let credentials = LoginData {
            email: email.to_string(),
            password: password.to_string(),
        };

        let (session, response) = match self.client.login(&credentials).await {
            Ok(exchanged) => exchanged,
            Err(e) => {
                tracing::warn!(status = ?e.status(), "Login failed: {}", e);
                self.set_state(SessionState::Unauthenticated);
                return Err(e);
            }
        };

        match self.credentials.save_session(&session).await {
            Ok(report) => {
                tracing::info!(
                    user_id = session.user_id,
                    role = session.role.as_deref().unwrap_or("none"),
                    complete = report.is_complete(),
                    "Login succeeded"
                );
                // Gating reads the user id, so the state follows it.
                self.set_state(if report.user_id_saved {
                    SessionState::Authenticated
                } else {
                    SessionState::Unauthenticated
                });
                Ok(response)
            }
            Err(e) => {
                self.set_state(SessionState::Unauthenticated);
                Err(AuthError::StorageWriteFailed(e))
            }
        }
    }

    /// Create an account. Never touches the stored session, whatever the outcome.
    pub async fn register(&self, input: &RegisterData) -> Result<UserRecordResponse, AuthError> {
        let response = self.client.register(input).await?;
        tracing::info!(email = %input.email, "Registration accepted");
        Ok(response)
    }

    /// Clear the stored session. Never fails; storage errors are only logged.
    pub async fn logout(&self) {
        self.credentials.clear_all().await;
        self.set_state(SessionState::Unauthenticated);
        tracing::info!("Logged out");
    }

    /// True iff a user id is stored and parses as an integer.
    pub async fn is_authenticated(&self) -> bool {
        self.credentials.get_user_id().await.is_some()
    }

    pub async fn token(&self) -> Option<String> {
        self.credentials.get_token().await
    }

    pub async fn role(&self) -> Option<String> {
        self.credentials.get_role().await
    }

    pub async fn user_id(&self) -> Option<i64> {
        self.credentials.get_user_id().await
    }

    /// The full session, or `None` if any of its fields is missing.
    pub async fn current_session(&self) -> Option<Session> {
        self.credentials.load_session().await
    }

    /// Fetch the signed-in user's profile record.
    pub async fn fetch_profile(&self) -> Result<UserRecordResponse, AuthError> {
        let user_id = self.user_id().await.ok_or(AuthError::NotAuthenticated)?;
        self.client.get_profile(user_id).await
    }
}

//! HTTP client for the fitness API's auth endpoints.
//!
//! Every exchange is one JSON request answered by an [`ApiEnvelope`]. The client
//! owns the timeout and folds transport failures, HTTP errors and envelope errors
//! into one [`AuthError`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{self, AppConfig};
use crate::models::*;
use crate::storage::StorageError;

const NETWORK_MESSAGE: &str = "Could not reach the server. Check your connection.";
const TIMEOUT_MESSAGE: &str = "The request timed out. Check your connection and try again.";
const REQUEST_FAILED_MESSAGE: &str = "The request failed";
const SERVER_ERROR_MESSAGE: &str = "The server reported an error";
const MALFORMED_MESSAGE: &str = "Unexpected response from the server";

/// Session and auth errors, shaped for direct display.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No HTTP response was received.
    #[error("Network failure: {detail}")]
    Network { detail: String },

    /// The client gave up after the configured timeout.
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Non-2xx status, `error: true`, or an envelope without usable data.
    #[error("{message} (status {status})")]
    Server { message: String, status: u16 },

    #[error("Could not save the session: {0}")]
    StorageWriteFailed(#[from] StorageError),

    #[error("No user is signed in")]
    NotAuthenticated,
}

impl AuthError {
    /// Numeric status: 0 for network failures, 408 for timeouts.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { .. } => Some(0),
            Self::Timeout(_) => Some(408),
            Self::Server { status, .. } => Some(*status),
            Self::StorageWriteFailed(_) | Self::NotAuthenticated => None,
        }
    }

    /// User-facing text.
    pub fn message(&self) -> String {
        match self {
            Self::Network { .. } => NETWORK_MESSAGE.to_string(),
            Self::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
            Self::Server { message, .. } => message.clone(),
            Self::StorageWriteFailed(_) => "Could not save your session on this device".to_string(),
            Self::NotAuthenticated => "Please sign in first".to_string(),
        }
    }

    /// Server error carrying the envelope's `message` as sent, or `fallback` when
    /// the field is missing.
    fn server(message: Option<String>, fallback: &str, status: StatusCode) -> Self {
        Self::Server {
            message: message.unwrap_or_else(|| fallback.to_string()),
            status: status.as_u16(),
        }
    }
}

/// Envelope as received, before anything is assumed about its shape.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    message: Option<String>,
    #[serde(default)]
    data: serde_json::Value,
    error: Option<bool>,
    #[serde(default)]
    status: serde_json::Value,
}

/// HTTP client for the auth API.
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl AuthClient {
    /// Create with explicit configuration.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(base_url, timeout, Client::new())
    }

    /// Create around a preconfigured `reqwest` client (proxies, TLS roots, ...).
    pub fn with_client(base_url: impl Into<String>, timeout: Duration, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ============================================================
    // Endpoints
    // ============================================================

    /// Exchange credentials for a session.
    ///
    /// Returns the session carried in `data` together with the envelope. A
    /// payload with an empty token is rejected with the response's HTTP status.
    pub async fn login(&self, credentials: &LoginData) -> Result<(Session, LoginResponse), AuthError> {
        let (status, envelope) = self
            .post::<_, AuthPayload>(config::LOGIN_ENDPOINT, credentials)
            .await?;
        match envelope.data.clone() {
            Some(payload) if !payload.token.is_empty() => Ok((Session::from(payload), envelope)),
            _ => Err(AuthError::server(None, MALFORMED_MESSAGE, status)),
        }
    }

    pub async fn register(&self, input: &RegisterData) -> Result<UserRecordResponse, AuthError> {
        let (_, envelope) = self.post(config::REGISTER_ENDPOINT, input).await?;
        Ok(envelope)
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<UserRecordResponse, AuthError> {
        let request = self
            .client
            .get(self.url(&config::profile_endpoint(user_id)))
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        let (_, envelope) = self.exchange(request).await?;
        Ok(envelope)
    }

    // ============================================================
    // Plumbing
    // ============================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<(StatusCode, ApiEnvelope<T>), AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // `.json()` sets `Content-Type: application/json`.
        let request = self.client.post(self.url(path)).json(body);
        self.exchange(request).await
    }

    /// Send the request and read the body under one timeout.
    async fn exchange<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, ApiEnvelope<T>), AuthError> {
        let round_trip = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.timeout, round_trip).await {
            Err(_) => {
                tracing::warn!("Request aborted after {:?}", self.timeout);
                return Err(AuthError::Timeout(self.timeout));
            }
            Ok(Err(e)) if e.is_timeout() => return Err(AuthError::Timeout(self.timeout)),
            Ok(Err(e)) => {
                tracing::warn!("Request failed before a response: {}", e);
                return Err(AuthError::Network {
                    detail: e.to_string(),
                });
            }
            Ok(Ok(parts)) => parts,
        };

        let envelope = normalize(status, &body)?;
        Ok((status, envelope))
    }
}

/// Turn a raw HTTP response into a typed envelope or an [`AuthError`].
fn normalize<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<ApiEnvelope<T>, AuthError> {
    let raw = serde_json::from_slice::<RawEnvelope>(body).ok();

    if !status.is_success() {
        return Err(AuthError::server(
            raw.and_then(|r| r.message),
            REQUEST_FAILED_MESSAGE,
            status,
        ));
    }

    let Some(raw) = raw else {
        return Err(AuthError::server(None, MALFORMED_MESSAGE, status));
    };

    if raw.error != Some(false) {
        return Err(AuthError::server(raw.message, SERVER_ERROR_MESSAGE, status));
    }
    if raw.data.is_null() {
        return Err(AuthError::server(raw.message, MALFORMED_MESSAGE, status));
    }

    let data = serde_json::from_value::<T>(raw.data).map_err(|e| {
        tracing::warn!("Envelope data did not match the expected shape: {}", e);
        AuthError::server(None, MALFORMED_MESSAGE, status)
    })?;

    Ok(ApiEnvelope {
        message: raw.message.unwrap_or_default(),
        data: Some(data),
        error: false,
        status: match raw.status {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => status.as_u16().to_string(),
            other => other.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_body(json: &str) -> Result<LoginResponse, AuthError> {
        normalize(StatusCode::OK, json.as_bytes())
    }

    #[test]
    fn successful_envelope_is_typed() {
        let envelope = login_body(
            r#"{"message":"ok","data":{"token":"T1","role":"admin","idUser":7},"error":false,"status":"200"}"#,
        )
        .unwrap();
        assert_eq!(envelope.message, "ok");
        assert_eq!(envelope.status, "200");
        assert_eq!(envelope.data.unwrap().id_user, 7);
    }

    #[test]
    fn error_flag_passes_message_through() {
        let err = login_body(r#"{"message":"Bad credentials","data":null,"error":true,"status":"401"}"#)
            .unwrap_err();
        assert_eq!(err.message(), "Bad credentials");
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn empty_error_message_is_kept_verbatim() {
        let err = normalize::<AuthPayload>(
            StatusCode::BAD_REQUEST,
            br#"{"message":"","data":null,"error":true,"status":"400"}"#,
        )
        .unwrap_err();
        assert_eq!(err.message(), "");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn missing_error_message_uses_fallback() {
        let err = login_body(r#"{"data":null,"error":true}"#).unwrap_err();
        assert_eq!(err.message(), SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn missing_data_is_rejected() {
        let err = login_body(r#"{"data":null,"error":false,"status":"200"}"#).unwrap_err();
        assert_eq!(err.message(), MALFORMED_MESSAGE);
    }

    #[test]
    fn incomplete_payload_is_rejected() {
        let err = login_body(r#"{"message":"ok","data":{"token":"T1"},"error":false,"status":"200"}"#)
            .unwrap_err();
        assert!(matches!(err, AuthError::Server { .. }));
    }

    #[test]
    fn http_error_prefers_body_message() {
        let err = normalize::<AuthPayload>(
            StatusCode::UNAUTHORIZED,
            br#"{"message":"Invalid password","error":true}"#,
        )
        .unwrap_err();
        assert_eq!(err.message(), "Invalid password");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn http_error_without_json_uses_fallback() {
        let err = normalize::<AuthPayload>(StatusCode::BAD_GATEWAY, b"<html>oops</html>").unwrap_err();
        assert_eq!(err.message(), REQUEST_FAILED_MESSAGE);
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn transport_errors_have_fixed_statuses() {
        let network = AuthError::Network {
            detail: "connection refused".to_string(),
        };
        assert_eq!(network.status(), Some(0));
        assert_eq!(AuthError::Timeout(Duration::from_secs(10)).status(), Some(408));
    }
}

use serde::{Deserialize, Deserializer, Serialize};

/// The response wrapper shared by every API endpoint.
///
/// A response is successful iff `error` is `false` and `data` is present.
/// Otherwise `message` is the user-facing error text, whatever the HTTP status.
/// The client only hands out envelopes that passed that check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub error: bool,
    /// Server-side status label. Some deployments send it as a number.
    #[serde(default, deserialize_with = "status_label")]
    pub status: String,
}

fn status_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

/// Fields posted to the registration endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub rol: RoleRef,
}

/// Reference to a server-side role by id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleRef {
    pub id: i64,
}

/// The `data` payload of a successful login. Only `token` and `idUser` are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(rename = "idUser")]
    pub id_user: i64,
}

/// Envelope returned by `login`.
pub type LoginResponse = ApiEnvelope<AuthPayload>;

/// Envelope returned by `register` and profile lookups; `data` is the user record.
pub type UserRecordResponse = ApiEnvelope<serde_json::Value>;

/// The authenticated identity of this installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Absent when the server did not assign one.
    pub role: Option<String>,
    pub user_id: i64,
}

impl From<AuthPayload> for Session {
    fn from(payload: AuthPayload) -> Self {
        Self {
            token: payload.token,
            role: payload.role,
            user_id: payload.id_user,
        }
    }
}

/// Lifecycle of the in-process session.
///
/// - `Unauthenticated`: No usable session
/// - `Authenticating`: A login exchange is in flight
/// - `Authenticated`: A session is stored and usable for gating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_accepts_numeric_status() {
        let envelope: LoginResponse = serde_json::from_str(
            r#"{"message":"ok","data":{"token":"T","role":"admin","idUser":3},"error":false,"status":200}"#,
        )
        .unwrap();
        assert_eq!(envelope.status, "200");
        assert_eq!(envelope.data.unwrap().role.as_deref(), Some("admin"));
    }

    #[test]
    fn envelope_with_null_data_decodes() {
        let envelope: UserRecordResponse =
            serde_json::from_str(r#"{"message":"nope","data":null,"error":false,"status":"400"}"#)
                .unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message, "nope");
    }

    #[test]
    fn login_payload_role_is_optional() {
        let missing: AuthPayload = serde_json::from_str(r#"{"token":"T1","idUser":7}"#).unwrap();
        let null: AuthPayload =
            serde_json::from_str(r#"{"token":"T1","role":null,"idUser":7}"#).unwrap();
        assert_eq!(missing.role, None);
        assert_eq!(null, missing);
        assert_eq!(Session::from(missing).user_id, 7);
    }

    #[test]
    fn register_body_uses_nested_role() {
        let body = serde_json::to_value(RegisterData {
            name: "Ana".to_string(),
            phone: "555".to_string(),
            email: "ana@example.com".to_string(),
            password: "pw".to_string(),
            rol: RoleRef { id: 2 },
        })
        .unwrap();
        assert_eq!(body["rol"]["id"], 2);
    }
}

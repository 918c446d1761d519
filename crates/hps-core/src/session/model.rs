use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{HpsError, Result};

/// The signed-in user as the backend describes it.
///
/// Only `name` and `email` are read by the client; everything else is kept
/// verbatim so it survives a save/restore cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        [self.name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("User")
    }
}

/// A backend session token together with its user. Both are always present;
/// an unauthenticated client simply has no `AuthenticatedSession`.
#[derive(Clone, PartialEq)]
pub struct AuthenticatedSession {
    pub token: String,
    pub user: User,
}

impl fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Body returned by `POST /auth/login` and `POST /auth/register`.
///
/// The backend sometimes wraps the payload in a `data` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthResponse {
    /// Parses either `{access_token, user}` or `{data: {access_token, user}}`.
    pub fn from_value(value: Value) -> Result<Self> {
        let payload = match value.get("data") {
            Some(data @ Value::Object(_)) => data.clone(),
            _ => value,
        };
        Ok(serde_json::from_value(payload)?)
    }

    /// Turns the response into a session, rejecting incomplete answers.
    pub fn into_session(self) -> Result<AuthenticatedSession> {
        let token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HpsError::validation("No access token received from backend"))?;
        let user = self
            .user
            .ok_or_else(|| HpsError::validation("No user profile received from backend"))?;
        Ok(AuthenticatedSession { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_response_flat() {
        let value = json!({"access_token": "tok", "user": {"id": 1, "name": "Ada", "picture": "p.png"}});
        let session = AuthResponse::from_value(value).unwrap().into_session().unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.user.display_name(), "Ada");
        assert_eq!(session.user.extra["picture"], "p.png");
    }

    #[test]
    fn test_auth_response_wrapped_in_data() {
        let value = json!({"data": {"access_token": "tok", "user": {"email": "ada@example.com"}}});
        let session = AuthResponse::from_value(value).unwrap().into_session().unwrap();
        assert_eq!(session.user.display_name(), "ada@example.com");
    }

    #[test]
    fn test_auth_response_without_token_is_rejected() {
        let value = json!({"user": {"name": "Ada"}});
        let err = AuthResponse::from_value(value)
            .unwrap()
            .into_session()
            .unwrap_err();
        assert_eq!(
            err,
            HpsError::validation("No access token received from backend")
        );
    }

    #[test]
    fn test_auth_response_without_user_is_rejected() {
        let value = json!({"access_token": "tok", "user": null});
        let err = AuthResponse::from_value(value)
            .unwrap()
            .into_session()
            .unwrap_err();
        assert!(matches!(err, HpsError::Validation(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = AuthenticatedSession {
            token: "secret-token".to_string(),
            user: User::default(),
        };
        let printed = format!("{:?}", session);
        assert!(!printed.contains("secret-token"));
    }

    #[test]
    fn test_user_roundtrip_keeps_unknown_fields() {
        let raw = r#"{"id":"u-1","name":"Ada","email":"ada@example.com","locale":"en"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        let back: Value = serde_json::to_value(&user).unwrap();
        assert_eq!(back["locale"], "en");
        assert_eq!(back["id"], "u-1");
    }
}

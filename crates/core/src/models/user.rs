use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// Username/password pair for `/token` and `/register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Keep passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(ClientError::Validation(
                "Username and password are required".into(),
            ));
        }
        Ok(())
    }

    /// Form fields expected by the OAuth2 password flow on `/token`.
    #[must_use]
    pub fn as_form(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), self.username.trim().to_string()),
            ("password".to_string(), self.password.clone()),
        ]
    }
}

/// The authenticated user as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Response body of `POST /token`.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// `{ "message": ... }` bodies returned by the delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

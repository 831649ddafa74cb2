use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::errors::{ClientError, GENERIC_API_ERROR};
use crate::models::route::Route;
use crate::navigation::Navigator;
use crate::storage::credential_store::CredentialStore;
use super::traits::{ApiRequest, ApiResponse, RequestBody, Transport};

/// Single choke point for every remote call.
///
/// Attaches the credential, classifies the response and tears the session
/// down on 401. Performs exactly one transport call per invocation: no
/// retries.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("transport", &self.transport.name())
            .field("authenticated", &self.credentials.is_authenticated())
            .finish()
    }
}

impl Gateway {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            credentials,
            navigator,
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Authenticated call.
    ///
    /// The current token (if any) goes out as `Authorization: Bearer`. A 401
    /// clears the credential store and redirects to login before
    /// `SessionExpired` is returned.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<T, ClientError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            bearer: self.credentials.load(),
        };
        let response = self.dispatch(request).await?;

        if response.is_unauthorized() {
            self.expire_session(path);
            return Err(ClientError::SessionExpired);
        }

        Self::classify(response, GENERIC_API_ERROR)
    }

    /// Unauthenticated call for `/token` and `/register`.
    ///
    /// Never attaches the credential; a 401 here is a rejected login, not an
    /// expired session, and comes back as `ClientError::Api` with `fallback`
    /// when the server gives no detail.
    pub async fn call_public<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            bearer: None,
        };
        let response = self.dispatch(request).await?;
        Self::classify(response, fallback)
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let method = request.method.clone();
        let path = request.path.clone();
        tracing::debug!(%method, %path, authorized = request.bearer.is_some(), "Sending request");

        match self.transport.send(request).await {
            Ok(response) => {
                tracing::debug!(%method, %path, status = response.status, "Received response");
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(%method, %path, error = %e, "Request failed without a response");
                Err(match e {
                    ClientError::Transport(_) => e,
                    other => ClientError::Transport(other.to_string()),
                })
            }
        }
    }

    fn expire_session(&self, path: &str) {
        tracing::warn!(%path, "Authorization rejected, clearing session");
        if let Err(e) = self.credentials.clear() {
            tracing::error!(error = %e, "Failed to clear credential");
        }
        self.navigator.navigate(Route::Login);
    }

    fn classify<T: DeserializeOwned>(response: ApiResponse, fallback: &str) -> Result<T, ClientError> {
        if response.is_success() {
            // Some endpoints answer with an empty body; let `()`-like targets accept it.
            let body = if response.body.trim().is_empty() { "null" } else { response.body.as_str() };
            return serde_json::from_str(body).map_err(|e| {
                ClientError::Deserialization(format!("Unexpected response body: {e}"))
            });
        }

        Err(ClientError::Api {
            status: response.status,
            message: error_detail(&response.body).unwrap_or_else(|| fallback.to_string()),
        })
    }
}

/// Pull the human-readable `detail` out of an error body.
///
/// Accepts `{"detail": "text"}` and FastAPI's validation shape
/// `{"detail": [{"msg": "..."}, ...]}` (messages joined with `; `).
pub fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

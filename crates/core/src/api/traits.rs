use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::errors::ClientError;

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent as `application/json`
    Json(serde_json::Value),
    /// Sent as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Serialize any value into a JSON body.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ClientError> {
        serde_json::to_value(value)
            .map(RequestBody::Json)
            .map_err(|e| ClientError::Serialization(format!("Failed to serialize request body: {e}")))
    }

    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            RequestBody::Json(_) => "application/json",
            RequestBody::Form(_) => "application/x-www-form-urlencoded",
        }
    }
}

/// A fully built request, ready to hand to a [`Transport`].
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    pub body: Option<RequestBody>,
    /// Bearer token for the `Authorization` header, if any
    pub bearer: Option<String>,
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_body", &self.body.is_some())
            .field("authorized", &self.bearer.is_some())
            .finish()
    }
}

/// Raw response: status code plus the unparsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Moves requests to the server and brings back whatever status it answered with.
///
/// Implementations return `Err(ClientError::Transport)` only when no
/// response was obtained at all; every HTTP status, including errors, is
/// an `Ok(ApiResponse)`. Classification is the gateway's job.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Transport: Send + Sync {
    /// Human-readable name (for logs).
    fn name(&self) -> &str;

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError>;
}

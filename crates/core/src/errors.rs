use thiserror::Error;

/// Generic message used when the server gives no `detail` for a failed call.
pub const GENERIC_API_ERROR: &str = "An API error occurred";

/// Unified error type for the entire finance-tracker-core library.
/// Every public function returns `Result<T, ClientError>`.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Client-side preconditions ───────────────────────────────────
    /// Never reaches the network.
    #[error("{0}")]
    Validation(String),

    // ── Session ─────────────────────────────────────────────────────
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    #[error("Not logged in")]
    NotAuthenticated,

    // ── API / Network ───────────────────────────────────────────────
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Local storage / config ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Configuration error: {0}")]
    Config(String),

    // ── Rendering ───────────────────────────────────────────────────
    #[error("Chart rendering failed: {0}")]
    Chart(String),
}

impl ClientError {
    /// `true` for errors that mean the credential is gone or unusable.
    #[must_use]
    pub fn is_session_error(&self) -> bool {
        matches!(self, ClientError::SessionExpired | ClientError::NotAuthenticated)
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for ClientError {
    fn from(e: bincode::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Deserialization(e.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(e: toml::de::Error) -> Self {
        ClientError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; drop the query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        ClientError::Transport(sanitized)
    }
}

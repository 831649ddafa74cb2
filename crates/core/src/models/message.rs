use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a transcript entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A query typed by the user
    User,
    /// A reply from the agent endpoint
    Agent,
    /// A client-side notification (e.g., "Successfully added transaction.")
    System,
    /// A failed call, shown in the agent's style
    Error,
}

/// Visual style a front-end should apply to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    UserMessage,
    AgentMessage,
    SystemNotification,
}

impl Role {
    #[must_use]
    pub fn style(&self) -> MessageStyle {
        match self {
            Role::User => MessageStyle::UserMessage,
            Role::Agent | Role::Error => MessageStyle::AgentMessage,
            Role::System => MessageStyle::SystemNotification,
        }
    }
}

/// A single transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.role {
            Role::User => write!(f, "You: {}", self.text),
            Role::Agent => write!(f, "Agent: {}", self.text),
            Role::Error => write!(f, "Error: {}", self.text),
            Role::System => write!(f, "{}", self.text),
        }
    }
}

/// Request body for `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Response body of `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

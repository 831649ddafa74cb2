use reqwest::Method;
use uuid::Uuid;

use crate::api::endpoints;
use crate::api::gateway::Gateway;
use crate::api::traits::RequestBody;
use crate::errors::ClientError;
use crate::models::message::{Message, QueryRequest, QueryResponse, Role};

/// Error entry appended when a submission is abandoned before its reply.
pub const QUERY_CANCELLED: &str = "Query cancelled";

/// A query whose user message is on screen and whose reply is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    /// Id of the user message this query belongs to
    pub message_id: Uuid,
    pub query: String,
}

/// Append-only chat transcript.
///
/// A submission is split in two halves so the ordering rules can be
/// exercised without a network: [`begin`](Self::begin) appends the user
/// message and disables input, [`complete`](Self::complete) appends the
/// reply (or the error) and re-enables it.
#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
    in_flight: bool,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// `false` while a query is awaiting its reply.
    #[must_use]
    pub fn is_input_enabled(&self) -> bool {
        !self.in_flight
    }

    /// Start a submission.
    ///
    /// Returns `None` (and appends nothing) for blank input or while
    /// another query is in flight.
    pub fn begin(&mut self, query: &str) -> Option<PendingQuery> {
        let query = query.trim();
        if query.is_empty() || self.in_flight {
            return None;
        }
        let message = Message::new(Role::User, query);
        let pending = PendingQuery {
            message_id: message.id,
            query: query.to_string(),
        };
        self.messages.push(message);
        self.in_flight = true;
        Some(pending)
    }

    /// Finish a submission with the agent's reply or the failure.
    pub fn complete(&mut self, pending: PendingQuery, result: Result<String, ClientError>) -> &Message {
        let message = match result {
            Ok(reply) => Message::new(Role::Agent, reply),
            Err(e) => {
                tracing::debug!(query_id = %pending.message_id, error = %e, "Query failed");
                Message::new(Role::Error, e.to_string())
            }
        };
        self.messages.push(message);
        self.in_flight = false;
        &self.messages[self.messages.len() - 1]
    }

    /// Send `query` to the agent endpoint.
    ///
    /// Blank input is a no-op (`None`, no request). Otherwise the user
    /// message is appended first, then exactly one agent or error message.
    pub async fn submit(&mut self, gateway: &Gateway, query: &str) -> Option<&Message> {
        let pending = self.begin(query)?;
        let mut outstanding = Outstanding {
            messages: &mut self.messages,
            in_flight: &mut self.in_flight,
            answered: false,
        };

        let result = match RequestBody::json(&QueryRequest {
            query: pending.query.clone(),
        }) {
            Ok(body) => gateway
                .call::<QueryResponse>(Method::POST, endpoints::QUERY, Some(body))
                .await
                .map(|r| r.response),
            Err(e) => Err(e),
        };

        outstanding.answered = true;
        drop(outstanding);
        Some(self.complete(pending, result))
    }

    /// Append an error entry for a failure outside a query (e.g., a failed create).
    pub fn report_error(&mut self, error: &ClientError) -> &Message {
        self.messages.push(Message::new(Role::Error, error.to_string()));
        &self.messages[self.messages.len() - 1]
    }

    /// Append a client-side notification.
    pub fn notify(&mut self, text: impl Into<String>) -> &Message {
        self.messages.push(Message::new(Role::System, text));
        &self.messages[self.messages.len() - 1]
    }
}

/// Held across the `/query` await. If the future is dropped first, the
/// user message still gets its error entry and input is re-enabled.
struct Outstanding<'a> {
    messages: &'a mut Vec<Message>,
    in_flight: &'a mut bool,
    answered: bool,
}

impl Drop for Outstanding<'_> {
    fn drop(&mut self) {
        if !self.answered {
            tracing::debug!("Query abandoned before reply");
            self.messages.push(Message::new(Role::Error, QUERY_CANCELLED));
        }
        *self.in_flight = false;
    }
}

//! The chat relay: validate, normalize history, invoke the model, shape the reply.

use crate::models::{normalize_history, ChatRequest, ChatResponse};
use crate::services::providers::{ChatProvider, ProviderError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use thiserror::Error;

/// Returned with 400 when the message is missing or blank.
pub const INVALID_MESSAGE_REPLY: &str = "Please enter a valid message.";

/// Returned with 500 on any upstream or internal failure.
pub const SERVER_ERROR_REPLY: &str = "Oops! Something went wrong on the server.";

/// Substituted when the model answers with nothing but whitespace.
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, I couldn’t generate a response this time.";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid input: message is empty")]
    InvalidInput,

    #[error("Upstream failure: {0}")]
    UpstreamFailure(#[from] ProviderError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, reply) = match self {
            RelayError::InvalidInput => (StatusCode::BAD_REQUEST, INVALID_MESSAGE_REPLY),
            RelayError::UpstreamFailure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_REPLY)
            }
        };

        (status, Json(ChatResponse::new(reply))).into_response()
    }
}

/// Forwards one message plus history to the configured [`ChatProvider`].
///
/// Holds no per-request state; a single instance is shared by all handlers.
pub struct ChatRelay {
    provider: Arc<dyn ChatProvider>,
}

impl ChatRelay {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    #[tracing::instrument(skip(self, request), fields(history_len))]
    pub async fn relay(&self, request: ChatRequest) -> Result<ChatResponse, RelayError> {
        let message = request.message.as_deref().map(str::trim).unwrap_or_default();
        if message.is_empty() {
            tracing::debug!("Rejecting empty message");
            return Err(RelayError::InvalidInput);
        }

        let history = normalize_history(request.history.unwrap_or_default());
        tracing::Span::current().record("history_len", history.len());

        let reply = match self.provider.send_message(&history, message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    user_message = %message,
                    error = %e,
                    "Chat provider call failed"
                );
                return Err(RelayError::UpstreamFailure(e));
            }
        };

        let reply = match reply.trim() {
            "" => {
                tracing::warn!(user_message = %message, "Provider returned an empty reply");
                EMPTY_REPLY_FALLBACK
            }
            text => text,
        };

        tracing::info!(user_message = %message, reply = %reply, "Chat exchange completed");

        Ok(ChatResponse::new(reply))
    }
}

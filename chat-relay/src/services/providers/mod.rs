//! Chat model provider abstractions and implementations.
//!
//! The relay talks to the model through [`ChatProvider`], so the Gemini
//! backend can be swapped for the recording mock in tests.

pub mod gemini;
pub mod mock;

use crate::models::ConversationTurn;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for conversational text providers (e.g., Gemini).
///
/// Implementations are constructed with the model identifier and the fixed
/// system instruction; each call opens a fresh session seeded with `history`
/// and submits `message` as the next user turn.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one message and return the raw reply text.
    async fn send_message(
        &self,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<String, ProviderError>;

    /// Verify the provider is reachable and the credential is accepted.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

//! Mock provider implementation for testing.

use super::{ChatProvider, ProviderError};
use crate::models::ConversationTurn;
use async_trait::async_trait;
use std::sync::Mutex;

/// A call captured by [`MockChatProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub history: Vec<ConversationTurn>,
    pub message: String,
}

enum Script {
    Reply(String),
    Fail(String),
}

/// Mock chat provider that answers from a script and records every call.
pub struct MockChatProvider {
    script: Script,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockChatProvider {
    /// Always reply with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_script(Script::Reply(text.into()))
    }

    /// Always fail with an API error carrying `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_script(Script::Fail(reason.into()))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn send_message(
        &self,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                history: history.to_vec(),
                message: message.to_string(),
            });
        }

        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Fail(reason) => Err(ProviderError::ApiError(reason.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.script {
            Script::Reply(_) => Ok(()),
            Script::Fail(reason) => Err(ProviderError::NotConfigured(reason.clone())),
        }
    }
}

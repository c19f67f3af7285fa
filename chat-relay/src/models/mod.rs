//! Domain models for the chat relay.

pub mod chat;

pub use chat::{normalize_history, ChatRequest, ChatResponse, ConversationTurn, HistoryItem, Role};

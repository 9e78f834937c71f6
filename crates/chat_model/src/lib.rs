//! Minimal provider-agnostic contract for a streaming chat call.
//!
//! This crate defines only the message shapes exchanged with a language model
//! and the lazy chunk stream a model hands back. It excludes transport
//! details, model selection and routing.

use std::fmt;

use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// Error surfaced by a model before or while streaming a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatModelError {
    message: String,
}

impl ChatModelError {
    /// Creates a new model error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ChatModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ChatModelError {}

impl From<String> for ChatModelError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ChatModelError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One part of a multipart message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    ImageUrl { url: String },
}

/// Message body: either plain text or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

impl MessageContent {
    /// Returns true when the content carries at least one non-text part.
    #[must_use]
    pub fn has_images(&self) -> bool {
        match self {
            Self::Text(_) => false,
            Self::Parts(parts) => parts
                .iter()
                .any(|part| matches!(part, MessagePart::ImageUrl { .. })),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Drops image payloads, keeping only text.
///
/// Text parts of multipart content are joined with a newline.
#[must_use]
pub fn strip_images(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Parts(parts) => parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text { text } => Some(text.as_str()),
                MessagePart::ImageUrl { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: MessageContent,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// One streamed fragment of a model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChunk {
    pub content: MessageContent,
}

impl ChatChunk {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: MessageContent::Text(text.into()),
        }
    }
}

/// Lazy, single-use sequence of response chunks.
pub type ChatStream = BoxStream<'static, Result<ChatChunk, ChatModelError>>;

/// Immutable metadata describing a chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProfile {
    pub provider_id: String,
    pub model_id: String,
}

/// Model interface for one streaming chat call.
pub trait ChatModel: Send + Sync + 'static {
    /// Returns provider/model identity metadata.
    fn profile(&self) -> ModelProfile;

    /// Starts a chat call and returns its chunk stream.
    ///
    /// Nothing is guaranteed to be produced until the stream is polled. A
    /// mid-stream failure is reported as the stream's last item.
    fn stream_chat(&self, messages: Vec<ChatMessage>) -> ChatStream;
}

//! Deterministic mock implementation of the shared `chat_model` contract.
//!
//! This crate contains no transport logic and is intended for local
//! development and contract-level integration testing.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chat_model::{
    ChatChunk, ChatMessage, ChatModel, ChatModelError, ChatStream, MessageContent, ModelProfile,
};
use futures_util::{stream, StreamExt};

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

#[derive(Debug, Clone, PartialEq, Eq)]
struct InjectedFailure {
    after_chunks: usize,
    message: String,
}

/// Scripted chat model used by pipeline tests and local runs.
#[derive(Debug)]
pub struct MockChatModel {
    script: Vec<MessageContent>,
    failure: Option<InjectedFailure>,
    token_delay: Duration,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatModel {
    /// Creates a mock model that streams the given text chunks on every call.
    #[must_use]
    pub fn new(chunks: Vec<String>) -> Self {
        Self::with_contents(chunks.into_iter().map(MessageContent::Text).collect())
    }

    /// Creates a mock model from raw chunk contents, including multipart ones.
    #[must_use]
    pub fn with_contents(script: Vec<MessageContent>) -> Self {
        Self {
            script,
            failure: None,
            token_delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Ends every stream with an error after `after_chunks` items were yielded.
    #[must_use]
    pub fn with_failure_after(mut self, after_chunks: usize, message: impl Into<String>) -> Self {
        self.failure = Some(InjectedFailure {
            after_chunks,
            message: message.into(),
        });
        self
    }

    /// Sleeps before each yielded item.
    #[must_use]
    pub fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = delay;
        self
    }

    /// Returns every message list received so far, in call order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        lock_unpoisoned(&self.requests).clone()
    }

    fn scripted_items(&self) -> Vec<Result<ChatChunk, ChatModelError>> {
        let mut items = Vec::new();

        for content in &self.script {
            match content {
                MessageContent::Text(text) => {
                    items.extend(
                        split_tokens(text)
                            .into_iter()
                            .map(|token| Ok(ChatChunk::text(token))),
                    );
                }
                parts @ MessageContent::Parts(_) => items.push(Ok(ChatChunk {
                    content: parts.clone(),
                })),
            }
        }

        if let Some(failure) = &self.failure {
            items.truncate(failure.after_chunks);
            items.push(Err(ChatModelError::new(failure.message.clone())));
        }

        items
    }
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::new(vec![
            "Here is the updated entry point.\n".to_string(),
            "\n".to_string(),
            "```rust src/main.rs\n".to_string(),
            "fn main() {\n".to_string(),
            "    println!(\"Hello from the assistant\");\n".to_string(),
            "}\n".to_string(),
            "```\n".to_string(),
            "\n".to_string(),
            "Run it with:\n".to_string(),
            "\n".to_string(),
            "```bash\n".to_string(),
            "cargo run\n".to_string(),
            "```\n".to_string(),
        ])
    }
}

impl ChatModel for MockChatModel {
    fn profile(&self) -> ModelProfile {
        ModelProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            model_id: "mock".to_string(),
        }
    }

    fn stream_chat(&self, messages: Vec<ChatMessage>) -> ChatStream {
        lock_unpoisoned(&self.requests).push(messages);

        let items = self.scripted_items();
        let delay = self.token_delay;
        if delay.is_zero() {
            return stream::iter(items).boxed();
        }

        stream::iter(items)
            .then(move |item| async move {
                tokio::time::sleep(delay).await;
                item
            })
            .boxed()
    }
}

/// Splits text into tokens that end at a space or newline.
fn split_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pending_token = String::new();

    for ch in text.chars() {
        pending_token.push(ch);
        if matches!(ch, ' ' | '\n') {
            tokens.push(std::mem::take(&mut pending_token));
        }
    }

    if !pending_token.is_empty() {
        tokens.push(pending_token);
    }

    tokens
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

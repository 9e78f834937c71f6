//! Built-in commands.

use chat_model::{strip_images, ChatMessage, ChatModel};
use futures_util::StreamExt;

use crate::command::ChunkStream;
use crate::error::CommandError;

mod comment;
mod edit;
mod onboard;

pub use comment::{CommentCommand, COMMENT_INSTRUCTION};
pub use edit::{build_edit_prompt, EditCommand};
pub use onboard::OnboardCommand;

/// Streams a chat call as text-only chunks.
pub(crate) fn stream_model_text(model: &dyn ChatModel, messages: Vec<ChatMessage>) -> ChunkStream {
    model
        .stream_chat(messages)
        .map(|item| {
            item.map(|chunk| strip_images(&chunk.content))
                .map_err(CommandError::from)
        })
        .boxed()
}

use std::path::Path;

use chat_model::ChatMessage;
use futures_util::{stream, StreamExt, TryStreamExt};

use crate::command::builtin::stream_model_text;
use crate::command::{ChunkStream, CodeSelection, Command, CommandContext, CommandHandler};
use crate::error::CommandError;

const DEFAULT_EDIT_REQUEST: &str = "Improve this code.";

/// Rewrites the highlighted selection according to the command input.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditCommand;

impl EditCommand {
    pub const NAME: &'static str = "edit";

    pub fn command() -> Command {
        Command::new(Self::NAME, "Edit highlighted code", Self)
    }
}

impl CommandHandler for EditCommand {
    fn run(&self, ctx: CommandContext) -> ChunkStream {
        stream::once(async move {
            let selection = ctx
                .workspace
                .selection
                .as_ref()
                .ok_or(CommandError::NothingSelected)?;
            let prompt = build_edit_prompt(selection, &ctx.input);
            Ok::<_, CommandError>(stream_model_text(
                ctx.model.as_ref(),
                vec![ChatMessage::user(prompt)],
            ))
        })
        .try_flatten()
        .boxed()
    }
}

pub fn build_edit_prompt(selection: &CodeSelection, request: &str) -> String {
    let request = match request.trim() {
        "" => DEFAULT_EDIT_REQUEST,
        trimmed => trimmed,
    };
    let info = fence_info(selection.filepath.as_deref());
    let code = selection.text.trim_end_matches('\n');

    format!(
        "Rewrite the code below according to this request: {request}\n\
         \n\
         ```{info}\n\
         {code}\n\
         ```\n\
         \n\
         Reply with the complete rewritten code in one fenced code block that \
         keeps the same opening fence line, followed by nothing else."
    )
}

/// Fence info line for a file: language tag followed by the path.
fn fence_info(filepath: Option<&str>) -> String {
    let Some(filepath) = filepath else {
        return String::new();
    };

    let extension = Path::new(filepath)
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default();
    let language = match extension {
        "rs" => "rust",
        "py" => "python",
        "ts" | "tsx" => "typescript",
        "js" | "jsx" | "mjs" => "javascript",
        "rb" => "ruby",
        "md" => "markdown",
        "" => "text",
        other => other,
    };

    format!("{language} {filepath}")
}

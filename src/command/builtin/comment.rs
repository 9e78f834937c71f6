use crate::command::builtin::EditCommand;
use crate::command::{delegate, ChunkStream, Command, CommandContext, CommandHandler};

pub const COMMENT_INSTRUCTION: &str =
    "Write comments for this code. Do not change the code itself.";

/// `edit` with a fixed instruction; output is the edit stream, chunk for chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentCommand {
    edit: EditCommand,
}

impl CommentCommand {
    pub const NAME: &'static str = "comment";

    pub fn command() -> Command {
        Command::new(
            Self::NAME,
            "Write comments for highlighted code",
            Self::default(),
        )
    }
}

impl CommandHandler for CommentCommand {
    fn run(&self, ctx: CommandContext) -> ChunkStream {
        delegate(&self.edit, &ctx, COMMENT_INSTRUCTION)
    }
}

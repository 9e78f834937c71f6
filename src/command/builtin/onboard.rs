use chat_model::ChatMessage;
use futures_util::{stream, StreamExt, TryStreamExt};

use crate::command::builtin::stream_model_text;
use crate::command::{ChunkStream, Command, CommandContext, CommandHandler};
use crate::context::{build_onboarding_prompt, ProjectContextCollector};
use crate::error::CommandError;

/// Explains the open workspace from its folder layout, READMEs and manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnboardCommand;

impl OnboardCommand {
    pub const NAME: &'static str = "onboard";

    pub fn command() -> Command {
        Command::new(Self::NAME, "Familiarize yourself with the codebase", Self)
    }
}

impl CommandHandler for OnboardCommand {
    fn run(&self, ctx: CommandContext) -> ChunkStream {
        stream::once(async move {
            let roots = ctx.host.list_workspace_roots().await?;
            let root = roots.into_iter().next().ok_or(CommandError::NoWorkspace)?;

            let digest = ProjectContextCollector::new(ctx.host.clone())
                .collect(&root)
                .await;
            tracing::info!(root = %root.display(), "onboarding prompt built");

            let prompt = build_onboarding_prompt(&digest);
            Ok::<_, CommandError>(stream_model_text(
                ctx.model.as_ref(),
                vec![ChatMessage::user(prompt)],
            ))
        })
        .try_flatten()
        .boxed()
    }
}

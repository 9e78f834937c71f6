//! Streaming commands and their dispatch layer.
//!
//! A command handler turns an execution context into a lazy chunk stream.
//! Handlers compose: one may run another with a derived context and forward
//! the inner stream as its own output.

use std::fmt;
use std::sync::Arc;

use chat_model::ChatModel;
use futures_util::stream::BoxStream;

use crate::error::CommandError;
use crate::host::Host;

pub mod builtin;
mod registry;

pub use registry::{parse_invocation, CommandRegistry, Invocation};

/// Lazy, single-use sequence of text fragments produced by a command.
pub type ChunkStream = BoxStream<'static, Result<String, CommandError>>;

/// Code the user highlighted before invoking a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSelection {
    pub filepath: Option<String>,
    pub text: String,
}

/// Editor state visible to commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceInfo {
    pub selection: Option<CodeSelection>,
}

/// Read-only bundle handed to every handler.
#[derive(Clone)]
pub struct CommandContext {
    pub model: Arc<dyn ChatModel>,
    pub host: Arc<dyn Host>,
    pub workspace: WorkspaceInfo,
    pub input: String,
}

impl CommandContext {
    pub fn new(model: Arc<dyn ChatModel>, host: Arc<dyn Host>, input: impl Into<String>) -> Self {
        Self {
            model,
            host,
            workspace: WorkspaceInfo::default(),
            input: input.into(),
        }
    }

    #[must_use]
    pub fn with_workspace(mut self, workspace: WorkspaceInfo) -> Self {
        self.workspace = workspace;
        self
    }

    /// Returns a new context carrying `input`; `self` is left untouched.
    #[must_use]
    pub fn with_input(&self, input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("model", &self.model.profile())
            .field("workspace", &self.workspace)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

pub trait CommandHandler: Send + Sync {
    /// Builds the command's output stream. Work starts when the stream is polled.
    fn run(&self, ctx: CommandContext) -> ChunkStream;
}

impl<F> CommandHandler for F
where
    F: Fn(CommandContext) -> ChunkStream + Send + Sync,
{
    fn run(&self, ctx: CommandContext) -> ChunkStream {
        self(ctx)
    }
}

/// Named, user-invocable handler.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn run(&self, ctx: CommandContext) -> ChunkStream {
        self.handler.run(ctx)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Runs `handler` with `input` substituted and forwards its stream.
///
/// Every chunk and the terminal error, if any, reach the caller in order and
/// unmodified.
pub fn delegate(
    handler: &dyn CommandHandler,
    ctx: &CommandContext,
    input: impl Into<String>,
) -> ChunkStream {
    handler.run(ctx.with_input(input))
}

//! Command streaming and code-block apply pipeline for an in-editor assistant.
//!
//! Invariant: the pipeline never touches the editor directly; every side
//! effect goes through [`Host`].
//!
//! # Public API Overview
//! - Register and run streaming commands via [`CommandRegistry`]. Handlers
//!   return a lazy [`ChunkStream`] and may delegate to one another.
//! - Collect a bounded, ignore-filtered project digest with
//!   [`ProjectContextCollector`] for the `onboard` command.
//! - Extract code blocks from a response and drive their apply lifecycle with
//!   [`ApplyController`], backed by the shared [`apply_store::ApplyStore`].
//! - Tie one assistant session together with [`AssistantSession`].

pub mod apply;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod logging;
pub mod session;

/// Command registry, handlers and streams.
pub use crate::command::{
    delegate, parse_invocation, ChunkStream, CodeSelection, Command, CommandContext,
    CommandHandler, CommandRegistry, Invocation, WorkspaceInfo,
};

/// Built-in commands.
pub use crate::command::builtin::{CommentCommand, EditCommand, OnboardCommand};

/// Project context collection.
pub use crate::context::{
    build_onboarding_prompt, DirectoryWalker, IgnoreRules, ProjectContextCollector,
};

/// Apply pipeline.
pub use crate::apply::{
    classify_block, extract_code_blocks, terminal_command, ApplyController, ApplyCursor,
    ApplyNextOutcome, BlockHandle, BlockKind, CodeBlock, CopyIndicator,
};

/// Host boundary.
pub use crate::host::{
    DirEntry, EntryKind, Host, HostCapabilities, HostEvent, HostNotification, HostRequest,
    HostResponse,
};

pub use crate::config::EnvConfig;
pub use crate::error::{ApplyError, CommandError, ContextReadError, HostError};
pub use crate::session::AssistantSession;

pub use apply_store::{ApplySession, ApplyStatus, ApplyStore, StreamId};

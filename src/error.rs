//! Error taxonomy for the pipeline.

use std::path::PathBuf;

use apply_store::ApplyStoreError;
use chat_model::ChatModelError;
use thiserror::Error;

/// Failure reported by the host boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("host I/O error while {operation} at {path}: {message}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("host rejected {event}: {message}")]
    Rejected { event: &'static str, message: String },
}

impl HostError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            message: source.to_string(),
        }
    }

    #[must_use]
    pub fn rejected(event: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            event,
            message: message.into(),
        }
    }
}

/// Failure while registering, dispatching or streaming a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },

    #[error("a command named '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("'{name}' is not a valid command name; use lowercase letters, digits, '-' or '_'")]
    InvalidName { name: String },

    #[error("model stream interrupted: {0}")]
    StreamInterrupted(#[from] ChatModelError),

    #[error("no workspace folder is open")]
    NoWorkspace,

    #[error("highlight the code to edit first")]
    NothingSelected,

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Entry skipped while collecting project context.
///
/// Never fails a traversal; it is logged and the walk continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextReadError {
    #[error("cannot list directory {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: HostError,
    },

    #[error("cannot read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: HostError,
    },

    #[error("invalid ignore pattern '{pattern}' in {path}: {message}")]
    IgnorePattern {
        path: PathBuf,
        pattern: String,
        message: String,
    },
}

/// Failure of a user apply action.
///
/// The session involved is always left in a stable state for retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Session(#[from] ApplyStoreError),

    #[error("host call failed: {0}")]
    HostCall(#[from] HostError),

    #[error("code block has no file target")]
    NoFileTarget,
}

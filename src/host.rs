//! Host boundary contract.
//!
//! The host is the editor process. The pipeline talks to it through two
//! primitives: a fire-and-forget [`Host::notify`] and an awaitable
//! [`Host::call`]. Apply completion flows back as an inbound [`HostEvent`].

use std::path::{Path, PathBuf};

use apply_store::StreamId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Outbound fire-and-forget message. Delivery is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostNotification {
    ApplyToFile {
        stream_id: StreamId,
        filepath: Option<String>,
        text: String,
    },
    AcceptDiff {
        filepath: Option<String>,
    },
    RejectDiff {
        filepath: Option<String>,
    },
    InsertAtCursor {
        text: String,
    },
    ShowFile {
        filepath: String,
    },
    CopyText {
        text: String,
    },
    RunCommand {
        command: String,
    },
}

impl HostNotification {
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ApplyToFile { .. } => "apply_to_file",
            Self::AcceptDiff { .. } => "accept_diff",
            Self::RejectDiff { .. } => "reject_diff",
            Self::InsertAtCursor { .. } => "insert_at_cursor",
            Self::ShowFile { .. } => "show_file",
            Self::CopyText { .. } => "copy_text",
            Self::RunCommand { .. } => "run_command",
        }
    }
}

/// Outbound request whose response is awaited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostRequest {
    ApplyToCurrentFile { stream_id: StreamId, text: String },
    CopyText { text: String },
}

impl HostRequest {
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ApplyToCurrentFile { .. } => "apply_to_current_file",
            Self::CopyText { .. } => "copy_text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostResponse {
    /// The host accepted and dispatched the request.
    Dispatched,
    /// The host accepted the request but had nothing to do.
    NoOp,
}

/// Inbound notification from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// The host finished applying a block and has a reviewable diff.
    ApplyCompleted { stream_id: StreamId },
}

/// Static facts about the connected host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Clipboard writes must go through [`Host::call`] instead of a notification.
    pub request_clipboard: bool,
}

#[async_trait]
pub trait Host: Send + Sync {
    async fn read_directory(&self, path: &Path) -> Result<Vec<DirEntry>, HostError>;

    async fn read_file(&self, path: &Path) -> Result<String, HostError>;

    async fn list_workspace_roots(&self) -> Result<Vec<PathBuf>, HostError>;

    /// Sends a notification without waiting for any acknowledgement.
    fn notify(&self, notification: HostNotification);

    async fn call(&self, request: HostRequest) -> Result<HostResponse, HostError>;
}

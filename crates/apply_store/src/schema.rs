use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier correlating one rendered code block with host events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(Uuid);

impl StreamId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for StreamId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStatus {
    #[default]
    Closed,
    Streaming,
    Done,
}

impl ApplyStatus {
    /// Returns whether the apply lifecycle allows moving from `self` to `next`.
    ///
    /// The only legal edges are `closed -> streaming`, `streaming -> done`
    /// and `done -> closed`.
    #[must_use]
    pub fn can_transition_to(self, next: ApplyStatus) -> bool {
        matches!(
            (self, next),
            (Self::Closed, Self::Streaming)
                | (Self::Streaming, Self::Done)
                | (Self::Done, Self::Closed)
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Streaming => "streaming",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySession {
    pub stream_id: StreamId,
    pub filepath: Option<String>,
    pub text: String,
    pub status: ApplyStatus,
}

impl ApplySession {
    /// Creates a session in its initial `closed` state.
    #[must_use]
    pub fn closed(stream_id: StreamId, filepath: Option<String>, text: impl Into<String>) -> Self {
        Self {
            stream_id,
            filepath,
            text: text.into(),
            status: ApplyStatus::Closed,
        }
    }

    /// Returns a copy of this record carrying `status`.
    #[must_use]
    pub fn with_status(&self, status: ApplyStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

use thiserror::Error;

use crate::schema::{ApplyStatus, StreamId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyStoreError {
    #[error("apply session {stream_id} is already registered")]
    DuplicateStreamId { stream_id: StreamId },

    #[error("no apply session registered for {stream_id}")]
    UnknownStreamId { stream_id: StreamId },

    #[error("apply session {stream_id} cannot move from {from} to {to}")]
    IllegalTransition {
        stream_id: StreamId,
        from: ApplyStatus,
        to: ApplyStatus,
    },
}

impl ApplyStoreError {
    #[must_use]
    pub fn illegal(stream_id: StreamId, from: ApplyStatus, to: ApplyStatus) -> Self {
        Self::IllegalTransition {
            stream_id,
            from,
            to,
        }
    }
}

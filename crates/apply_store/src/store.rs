use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;

use crate::error::ApplyStoreError;
use crate::schema::{ApplySession, ApplyStatus, StreamId};

/// Ordered copy of every session, as delivered to observers.
pub type StoreSnapshot = Vec<ApplySession>;

#[derive(Debug, Default)]
struct StoreState {
    sessions: Vec<ApplySession>,
    index_by_id: HashMap<StreamId, usize>,
}

impl StoreState {
    fn position(&self, stream_id: &StreamId) -> Result<usize, ApplyStoreError> {
        self.index_by_id
            .get(stream_id)
            .copied()
            .ok_or(ApplyStoreError::UnknownStreamId {
                stream_id: *stream_id,
            })
    }

    fn rebuild_index(&mut self) {
        self.index_by_id = self
            .sessions
            .iter()
            .enumerate()
            .map(|(index, session)| (session.stream_id, index))
            .collect();
    }
}

/// Shared source of truth for apply sessions.
#[derive(Debug)]
pub struct ApplyStore {
    state: Mutex<StoreState>,
    updates: watch::Sender<StoreSnapshot>,
}

impl Default for ApplyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplyStore {
    #[must_use]
    pub fn new() -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            state: Mutex::new(StoreState::default()),
            updates,
        }
    }

    /// Adds a new session at the end of the collection.
    pub fn register(&self, session: ApplySession) -> Result<(), ApplyStoreError> {
        let mut state = self.lock_state();
        if state.index_by_id.contains_key(&session.stream_id) {
            return Err(ApplyStoreError::DuplicateStreamId {
                stream_id: session.stream_id,
            });
        }

        let next_index = state.sessions.len();
        state.index_by_id.insert(session.stream_id, next_index);
        tracing::debug!(stream_id = %session.stream_id, "apply session registered");
        state.sessions.push(session);
        self.publish(&state);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, stream_id: &StreamId) -> Option<ApplySession> {
        let state = self.lock_state();
        let index = state.index_by_id.get(stream_id)?;
        state.sessions.get(*index).cloned()
    }

    /// Returns the session status; unknown ids read as `closed`.
    #[must_use]
    pub fn status(&self, stream_id: &StreamId) -> ApplyStatus {
        self.get(stream_id)
            .map(|session| session.status)
            .unwrap_or_default()
    }

    /// Moves a session to `next`, replacing its record in one step.
    ///
    /// Fails without touching the store when the edge is not part of the
    /// apply lifecycle.
    pub fn transition(
        &self,
        stream_id: &StreamId,
        next: ApplyStatus,
    ) -> Result<ApplySession, ApplyStoreError> {
        let mut state = self.lock_state();
        let index = state.position(stream_id)?;
        let current = &state.sessions[index];
        if !current.status.can_transition_to(next) {
            return Err(ApplyStoreError::illegal(*stream_id, current.status, next));
        }

        let replaced = current.with_status(next);
        tracing::debug!(
            stream_id = %stream_id,
            from = %current.status,
            to = %next,
            "apply session transition"
        );
        state.sessions[index] = replaced.clone();
        self.publish(&state);
        Ok(replaced)
    }

    /// Replaces the file target and text of a session whose block was
    /// re-rendered. The status is carried over unchanged.
    pub fn update_content(
        &self,
        stream_id: &StreamId,
        filepath: Option<String>,
        text: String,
    ) -> Result<ApplySession, ApplyStoreError> {
        let mut state = self.lock_state();
        let index = state.position(stream_id)?;
        let current = &state.sessions[index];
        if current.filepath == filepath && current.text == text {
            return Ok(current.clone());
        }

        let replaced = ApplySession {
            filepath,
            text,
            ..current.clone()
        };
        state.sessions[index] = replaced.clone();
        self.publish(&state);
        Ok(replaced)
    }

    /// Removes a session whose block is no longer displayed.
    pub fn evict(&self, stream_id: &StreamId) -> Option<ApplySession> {
        let mut state = self.lock_state();
        let index = state.index_by_id.get(stream_id).copied()?;
        let removed = state.sessions.remove(index);
        state.rebuild_index();
        tracing::debug!(stream_id = %stream_id, "apply session evicted");
        self.publish(&state);
        Some(removed)
    }

    /// Drops every session. Used when the owning assistant session ends.
    pub fn clear(&self) {
        let mut state = self.lock_state();
        state.sessions.clear();
        state.index_by_id.clear();
        self.publish(&state);
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock_state().sessions.clone()
    }

    /// Returns a receiver that observes a fresh snapshot after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.updates.subscribe()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_state().sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn publish(&self, state: &StoreState) {
        self.updates.send_replace(state.sessions.clone());
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

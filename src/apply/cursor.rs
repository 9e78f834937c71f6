use std::sync::atomic::{AtomicUsize, Ordering};

/// Index of the code block that "apply next" targets, in document order.
///
/// Persists across commands; only [`ApplyCursor::reset`] moves it back.
#[derive(Debug, Default)]
pub struct ApplyCursor {
    next: AtomicUsize,
}

impl ApplyCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }

    /// Moves to the following block and returns the new index.
    pub fn advance(&self) -> usize {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Takes the index at the cursor and moves past it in one step.
    ///
    /// Returns `None` without moving when the cursor is at or beyond `len`.
    pub fn claim(&self, len: usize) -> Option<usize> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |index| {
                (index < len).then_some(index + 1)
            })
            .ok()
    }

    pub fn reset(&self) {
        self.next.store(0, Ordering::SeqCst);
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// How long a block shows "copied" after a copy action.
pub const COPIED_INDICATOR_DURATION: Duration = Duration::from_millis(2000);

/// Transient per-block "copied" flag, independent of the apply lifecycle.
///
/// Each copy restarts the window; an older timer never clears a newer copy.
#[derive(Debug, Clone)]
pub struct CopyIndicator {
    inner: Arc<IndicatorState>,
}

#[derive(Debug)]
struct IndicatorState {
    copied: watch::Sender<bool>,
    generation: AtomicU64,
}

impl Default for CopyIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyIndicator {
    pub fn new() -> Self {
        let (copied, _) = watch::channel(false);
        Self {
            inner: Arc::new(IndicatorState {
                copied,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn is_copied(&self) -> bool {
        *self.inner.copied.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.copied.subscribe()
    }

    /// Raises the flag and schedules it to drop after
    /// [`COPIED_INDICATOR_DURATION`]. Must be called inside a tokio runtime.
    pub fn mark_copied(&self) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.copied.send_replace(true);

        let state = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(COPIED_INDICATOR_DURATION).await;
            if state.generation.load(Ordering::SeqCst) == generation {
                state.copied.send_replace(false);
            }
        });
    }
}

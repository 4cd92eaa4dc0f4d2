//! Debounce bookkeeping for prompt refreshes
//!
//! Each session owns at most one live refresh timer. A new delivery
//! supersedes the previous timer; a superseded or reset timer must
//! never fire its action. Two mechanisms cooperate:
//! - The old task is aborted as a fast path.
//! - A generation counter, bumped and compared under the session lock,
//!   closes the race where an already-awake timer is waiting on the
//!   lock when it gets superseded.

use tokio::task::JoinHandle;

/// Cancel-and-replace timer state for one session
#[derive(Debug, Default)]
pub struct DebounceControl {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl DebounceControl {
    /// Create idle control with no live timer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate any outstanding timer and return the generation a
    /// replacement timer must carry
    ///
    /// Must be called under the session lock.
    pub fn supersede(&mut self) -> u64 {
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation
    }

    /// Record the newly spawned timer task
    #[inline]
    pub fn arm(&mut self, task: JoinHandle<()>) {
        self.task = Some(task);
    }

    /// Called by a firing timer: claim the right to act
    ///
    /// Returns true iff `generation` is still current, clearing the
    /// live-timer marker in the same step. Must be called under the
    /// session lock; a stale timer gets false and must do nothing.
    #[must_use]
    pub fn try_fire(&mut self, generation: u64) -> bool {
        if self.generation == generation {
            self.task = None;
            true
        } else {
            false
        }
    }

    /// Cancel any outstanding timer without scheduling a replacement
    pub fn cancel(&mut self) {
        let _ = self.supersede();
    }

    /// True while a timer task is recorded and not yet finished
    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Current generation (test observability)
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

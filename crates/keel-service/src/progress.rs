//! Completion tracking for submitted command lists.
//!
//! Lists execute strictly in submission order, so a single monotonic
//! counter (`completed`) covers the common case: a list with sequence
//! number `n` has fully executed exactly when `completed >= n`. Lists
//! that settle without executing (failed, cancelled, dropped) get an
//! explicit outcome record instead, keyed by sequence number, so a
//! waiter is told what happened rather than blocking forever.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use keel_core::{CommandError, Progress};

use crate::error::WaitError;

/// How a list settled without completing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ListOutcome {
    Failed(CommandError),
    Cancelled,
    Dropped,
}

#[derive(Debug, Default)]
struct State {
    /// Highest sequence number whose list has fully executed.
    completed: u64,
    /// Terminal outcomes for lists that settled without completing.
    /// Retained until the tracker is dropped; in insertion order for
    /// diagnostics.
    outcomes: IndexMap<u64, ListOutcome>,
    /// Set once at teardown; wakes and fails all remaining waiters.
    shutdown: bool,
}

/// Blocks waiters until their list settles.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    state: Mutex<State>,
    settled: Condvar,
}

impl ProgressTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The highest fully-executed sequence number.
    pub fn completed(&self) -> Progress {
        Progress(self.state.lock().unwrap().completed)
    }

    /// Has the list with the given target settled (in any way)?
    pub fn is_settled(&self, target: Progress) -> bool {
        let state = self.state.lock().unwrap();
        state.completed >= target.0 || state.outcomes.contains_key(&target.0)
    }

    /// Record that the list tagged `seq` fully executed.
    pub(crate) fn complete(&self, seq: u64) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(seq > state.completed, "completion must be monotonic");
        state.completed = seq;
        drop(state);
        self.settled.notify_all();
    }

    /// Record a terminal non-completion outcome for the list tagged `seq`.
    pub(crate) fn resolve(&self, seq: u64, outcome: ListOutcome) {
        let mut state = self.state.lock().unwrap();
        state.outcomes.insert(seq, outcome);
        drop(state);
        self.settled.notify_all();
    }

    /// Wake every waiter with [`WaitError::Shutdown`] and refuse new
    /// waits for unsettled targets.
    pub(crate) fn mark_shutdown(&self) {
        self.state.lock().unwrap().shutdown = true;
        self.settled.notify_all();
    }

    fn check(&self, state: &State, target: Progress) -> Option<Result<(), WaitError>> {
        if let Some(outcome) = state.outcomes.get(&target.0) {
            return Some(Err(match outcome {
                ListOutcome::Failed(e) => WaitError::CommandFailed(e.clone()),
                ListOutcome::Cancelled => WaitError::Cancelled,
                ListOutcome::Dropped => WaitError::Dropped,
            }));
        }
        if state.completed >= target.0 {
            return Some(Ok(()));
        }
        if state.shutdown {
            return Some(Err(WaitError::Shutdown));
        }
        None
    }

    /// Block until the list with the given target settles.
    pub fn wait(&self, target: Progress) -> Result<(), WaitError> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(result) = self.check(&state, target) {
                return result;
            }
            state = self.settled.wait(state).unwrap();
        }
    }

    /// Block until the list settles or `timeout` elapses.
    pub fn wait_timeout(&self, target: Progress, timeout: Duration) -> Result<(), WaitError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(result) = self.check(&state, target) {
                return result;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(WaitError::TimedOut);
            }
            let (guard, _) = self.settled.wait_timeout(state, remaining).unwrap();
            state = guard;
        }
    }
}

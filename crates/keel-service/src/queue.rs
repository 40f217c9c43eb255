//! Bounded FIFO queue of pending command lists.
//!
//! Each accepted list is tagged with a monotonically increasing
//! sequence number starting at 1. The sequence number doubles as the
//! list's [`Progress`] target: once the service's completion counter
//! reaches it (or an outcome is recorded for it), the list is settled.

use std::collections::VecDeque;
use std::sync::Mutex;

use keel_core::{CommandList, Progress};

use crate::error::SubmitError;

/// A queued command list and its sequence tag.
#[derive(Debug)]
pub(crate) struct Entry<C> {
    pub(crate) seq: u64,
    pub(crate) list: CommandList<C>,
}

/// Receipt for one accepted command list.
///
/// Returned by [`ServiceProxy::submit`](crate::ServiceProxy::submit);
/// pass [`SubmittedList::progress`] to
/// [`ServiceProxy::wait`](crate::ServiceProxy::wait) to block until the
/// list settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmittedList {
    progress: Progress,
}

impl SubmittedList {
    pub(crate) fn new(seq: u64) -> Self {
        Self {
            progress: Progress(seq),
        }
    }

    /// The completion target for this list.
    pub fn progress(&self) -> Progress {
        self.progress
    }
}

#[derive(Debug)]
struct State<C> {
    entries: VecDeque<Entry<C>>,
    next_seq: u64,
    /// Set once at shutdown, under the same mutex that guards
    /// submission, so no list can slip in behind the final drain.
    closed: bool,
}

/// The pending-list queue shared by producers and the update pass.
#[derive(Debug)]
pub struct CommandQueue<C> {
    state: Mutex<State<C>>,
    capacity: usize,
}

impl<C> CommandQueue<C> {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            state: Mutex::new(State {
                entries: VecDeque::with_capacity(capacity),
                next_seq: 1,
                closed: false,
            }),
            capacity,
        }
    }

    /// Enqueue a list, assigning it the next sequence number.
    pub(crate) fn submit(&self, list: CommandList<C>) -> Result<u64, SubmitError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(SubmitError::Shutdown);
        }
        if state.entries.len() >= self.capacity {
            return Err(SubmitError::QueueFull {
                capacity: self.capacity,
            });
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.push_back(Entry { seq, list });
        Ok(seq)
    }

    /// Refuse all further submissions.
    ///
    /// Runs under the submission mutex: once `close` returns, any
    /// concurrent `submit` has either already enqueued (and will be
    /// found by the shutdown drain) or gets [`SubmitError::Shutdown`].
    pub(crate) fn close(&self) {
        self.state.lock().unwrap().closed = true;
    }

    /// Remove a still-queued list. Returns `false` if it has already
    /// been taken by an update pass (or never existed).
    pub(crate) fn cancel(&self, seq: u64) -> bool {
        let mut state = self.state.lock().unwrap();
        let before = state.entries.len();
        state.entries.retain(|entry| entry.seq != seq);
        state.entries.len() != before
    }

    /// Take the lists that were queued when the call began.
    ///
    /// Lists submitted while the returned batch executes stay queued
    /// for the next pass, so a fast producer cannot pin an update pass
    /// in the drain loop.
    pub(crate) fn take_snapshot(&self) -> Vec<Entry<C>> {
        let mut state = self.state.lock().unwrap();
        let count = state.entries.len();
        state.entries.drain(..count).collect()
    }

    /// Take everything, including lists queued mid-drain.
    pub(crate) fn take_all(&self) -> Vec<Entry<C>> {
        let mut state = self.state.lock().unwrap();
        state.entries.drain(..).collect()
    }

    /// Return unexecuted entries to the head of the queue, preserving
    /// their order ahead of anything submitted since.
    pub(crate) fn requeue_front(&self, entries: Vec<Entry<C>>) {
        let mut state = self.state.lock().unwrap();
        for entry in entries.into_iter().rev() {
            state.entries.push_front(entry);
        }
    }

    /// Number of pending lists.
    pub(crate) fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }
}

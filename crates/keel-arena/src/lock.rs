//! Reader/writer lock discipline for arena-owning state.
//!
//! [`Locked<T>`] is the only way shared code reaches a service's state:
//! `&mut T` exists exclusively inside a [`with_unique`](Locked::with_unique)
//! closure, so a mutating operation without the exclusive lock does not
//! compile. The original engine tracked lock state with runtime flags and
//! asserted on misuse; the closure-guard shape deletes that failure mode.
//!
//! Re-entrancy is not supported: acquiring the same `Locked` again from
//! inside one of its closures deadlocks (`std::sync::RwLock` is not
//! re-entrant).

use std::sync::RwLock;

/// A reader/writer wrapper: many concurrent readers or one writer.
///
/// # Examples
///
/// ```
/// use keel_arena::{Arena, Locked};
///
/// let pool = Locked::new(Arena::new());
/// let h = pool.with_unique(|arena| arena.add(7).unwrap());
/// let doubled = pool.with_shared(|arena| arena.get(h).copied().unwrap() * 2);
/// assert_eq!(doubled, 14);
/// ```
#[derive(Debug, Default)]
pub struct Locked<T> {
    inner: RwLock<T>,
}

impl<T> Locked<T> {
    /// Wrap a value.
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
        }
    }

    /// Run `f` with shared (read) access.
    ///
    /// Any number of threads may be inside `with_shared` concurrently;
    /// none may overlap a [`with_unique`](Locked::with_unique) holder.
    pub fn with_shared<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read().unwrap();
        f(&guard)
    }

    /// Run `f` with exclusive (write) access.
    ///
    /// The closure receives the only live `&mut T`; the service's update
    /// path opens one `with_unique` span per tick and passes the
    /// reference down to every command it executes.
    pub fn with_unique<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write().unwrap();
        f(&mut guard)
    }

    /// Unwrap the inner value, consuming the lock.
    pub fn into_inner(self) -> T {
        self.inner.into_inner().unwrap()
    }
}

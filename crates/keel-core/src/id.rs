//! The [`Progress`] submission/completion counter.

use std::fmt;

/// Monotonically increasing service progress counter.
///
/// Each submitted command list is assigned the next value of this
/// counter; the service's completion counter reaches that value once
/// the list (and every list queued before it) has fully executed.
/// `Progress(0)` means "nothing has completed yet".
///
/// # Examples
///
/// ```
/// use keel_core::Progress;
///
/// let target = Progress(3);
/// let completed = Progress(5);
/// assert!(completed >= target, "list 3 has executed");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Progress(pub u64);

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Progress {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

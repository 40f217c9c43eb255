//! Error types for the service-command protocol.

use std::error::Error;
use std::fmt;

use keel_core::{CommandError, Progress};

/// Error submitting a command list to a service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The command queue is at capacity (back-pressure).
    QueueFull {
        /// The queue's capacity.
        capacity: usize,
    },
    /// The service is shutting down and no longer accepts submissions.
    Shutdown,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull { capacity } => {
                write!(f, "command queue full ({capacity} lists)")
            }
            Self::Shutdown => write!(f, "service is shutting down"),
        }
    }
}

impl Error for SubmitError {}

/// A command failed while the update path drained the queue.
///
/// The failing command aborts the rest of its list and the remainder of
/// that tick (fail-fast, no rollback); lists that had not started stay
/// queued for the next tick. The same failure is recorded as the list's
/// outcome, so a waiter on the list's progress value observes
/// [`WaitError::CommandFailed`] rather than an indefinite hang.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateError {
    /// Name of the service whose update failed.
    pub service: String,
    /// Submission sequence number of the failing list.
    pub list: Progress,
    /// Zero-based index of the failing command within its list.
    pub command_index: usize,
    /// The underlying command failure.
    pub reason: CommandError,
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "service '{}': command {} in list {} failed: {}",
            self.service, self.command_index, self.list, self.reason
        )
    }
}

impl Error for UpdateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.reason)
    }
}

/// Error observed while waiting for a submitted list to complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WaitError {
    /// A command in the awaited list failed; the list did not complete.
    CommandFailed(CommandError),
    /// The awaited list was cancelled before execution.
    Cancelled,
    /// The awaited list was still queued when the service shut down and
    /// was dropped unexecuted.
    Dropped,
    /// The service shut down before the awaited list was resolved.
    Shutdown,
    /// The wait's timeout elapsed first.
    TimedOut,
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandFailed(e) => write!(f, "awaited list failed: {e}"),
            Self::Cancelled => write!(f, "awaited list was cancelled"),
            Self::Dropped => write!(f, "awaited list was dropped at shutdown"),
            Self::Shutdown => write!(f, "service shut down"),
            Self::TimedOut => write!(f, "wait timed out"),
        }
    }
}

impl Error for WaitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CommandFailed(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors from [`ServiceRegistry`](crate::ServiceRegistry) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A service of the same type is already registered.
    DuplicateService {
        /// Name of the service already occupying the slot.
        name: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateService { name } => {
                write!(f, "a service of this type is already registered: '{name}'")
            }
        }
    }
}

impl Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_error_display() {
        let e = UpdateError {
            service: "window".into(),
            list: Progress(5),
            command_index: 2,
            reason: CommandError::Failed {
                reason: "no monitor".into(),
            },
        };
        assert_eq!(
            e.to_string(),
            "service 'window': command 2 in list 5 failed: command failed: no monitor"
        );
    }

    #[test]
    fn submit_error_display() {
        assert_eq!(
            SubmitError::QueueFull { capacity: 8 }.to_string(),
            "command queue full (8 lists)"
        );
    }
}

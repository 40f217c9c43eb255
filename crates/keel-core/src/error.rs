//! Error types shared across the keel workspace.

use std::error::Error;
use std::fmt;

/// Errors from executing a single service command.
///
/// Returned by [`Service::execute`](crate::Service::execute). The first
/// command in a list that returns an error aborts the rest of the list
/// and the remainder of that update tick (fail-fast, no rollback).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// A resource handle carried by the command was stale, out of range,
    /// or never issued.
    InvalidHandle {
        /// Human-readable description of the invalid handle.
        detail: String,
    },
    /// A fixed-capacity resource pool could not accept the command.
    CapacityExceeded {
        /// Human-readable description of the exhausted pool.
        detail: String,
    },
    /// The command's own logic failed.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle { detail } => write!(f, "invalid handle: {detail}"),
            Self::CapacityExceeded { detail } => write!(f, "capacity exceeded: {detail}"),
            Self::Failed { reason } => write!(f, "command failed: {reason}"),
        }
    }
}

impl Error for CommandError {}

/// Error from [`Service::setup`](crate::Service::setup).
///
/// Setup runs exactly once, during host construction; a failure here
/// (e.g. a missing dependency) prevents the service from ever becoming
/// reachable, so there is no partially-set-up state to misuse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupError {
    /// Human-readable description of what prevented setup.
    pub reason: String,
}

impl SetupError {
    /// Create a setup error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "setup failed: {}", self.reason)
    }
}

impl Error for SetupError {}

//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use keel_core::CommandError;

use crate::handle::Handle;

/// Errors from arena operations.
///
/// Every contract violation the original engine treated as a fatal
/// assertion is a recoverable variant here, so a stale handle inside a
/// command surfaces to the submitter instead of aborting the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The handle's index is beyond the arena's slot range.
    IndexOutOfRange {
        /// The out-of-range index.
        index: usize,
        /// Number of slots in the arena.
        slot_count: usize,
    },
    /// The handle's generation is behind the slot's current generation —
    /// the slot was erased (and possibly recycled) after the handle was
    /// issued.
    StaleHandle {
        /// The stale handle.
        handle: Handle,
        /// The slot's current generation.
        current_generation: u64,
    },
    /// The slot exists and the generation matches, but nothing occupies
    /// it (possible for pre-sized slots that were never filled).
    VacantSlot {
        /// The vacant slot's index.
        index: usize,
    },
    /// A fixed-capacity arena cannot accept another element.
    CapacityExceeded {
        /// The arena's capacity.
        capacity: usize,
    },
    /// The never-issued sentinel handle (generation 0) was used.
    InvalidHandle,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, slot_count } => {
                write!(f, "index {index} out of range ({slot_count} slots)")
            }
            Self::StaleHandle {
                handle,
                current_generation,
            } => {
                write!(
                    f,
                    "stale handle {handle}: slot is at generation {current_generation}"
                )
            }
            Self::VacantSlot { index } => write!(f, "slot {index} is vacant"),
            Self::CapacityExceeded { capacity } => {
                write!(f, "arena capacity exceeded ({capacity} slots)")
            }
            Self::InvalidHandle => write!(f, "sentinel handle used"),
        }
    }
}

impl Error for ArenaError {}

impl From<ArenaError> for CommandError {
    fn from(e: ArenaError) -> Self {
        match e {
            ArenaError::CapacityExceeded { .. } => CommandError::CapacityExceeded {
                detail: e.to_string(),
            },
            _ => CommandError::InvalidHandle {
                detail: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_command_error() {
        let e = ArenaError::StaleHandle {
            handle: Handle::from_parts(1, 1),
            current_generation: 2,
        };
        match CommandError::from(e) {
            CommandError::InvalidHandle { detail } => {
                assert!(detail.contains("generation 2"));
            }
            other => panic!("expected InvalidHandle, got {other:?}"),
        }

        let e = ArenaError::CapacityExceeded { capacity: 8 };
        assert!(matches!(
            CommandError::from(e),
            CommandError::CapacityExceeded { .. }
        ));
    }
}

//! Generation-scoped resource handles.
//!
//! A [`Handle`] identifies a slot in an [`Arena`](crate::Arena). The
//! `generation` field allows O(1) staleness checks: when a slot is
//! recycled its generation is bumped, so handles issued before the
//! recycle stop matching.

use std::fmt;

/// Generation assigned to the first occupant of a fresh slot.
///
/// Generation 0 is reserved for the never-issued sentinel
/// ([`Handle::INVALID`]); every handle an arena actually returns has a
/// generation of at least this value.
pub const FIRST_GENERATION: u64 = 1;

/// A copyable `(index, generation)` pair identifying an arena slot.
///
/// Two handles refer to the same logical resource iff both fields are
/// equal. Handles are plain data: they may be freely copied, stored, and
/// passed across threads, but dereferencing one (get/erase) must happen
/// through the arena, inside the owning service's lock.
///
/// # Examples
///
/// ```
/// use keel_arena::{Arena, Handle};
///
/// let mut arena = Arena::new();
/// let h = arena.add("torch").unwrap();
/// assert!(h.is_valid());
/// assert_eq!(arena.get(h), Ok(&"torch"));
///
/// // A default handle never matches anything.
/// assert!(!arena.contains(Handle::INVALID));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: usize,
    generation: u64,
}

impl Handle {
    /// The never-issued sentinel handle (generation 0).
    pub const INVALID: Handle = Handle {
        index: 0,
        generation: 0,
    };

    /// Build a handle from a bare index and a generation.
    ///
    /// Intended for callers that keep a bare index elsewhere and
    /// re-derive a fresh handle via
    /// [`Arena::generation_of`](crate::Arena::generation_of).
    pub fn from_parts(index: usize, generation: u64) -> Self {
        Self { index, generation }
    }

    /// The slot index this handle points at.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The generation this handle was issued under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether this handle was ever issued by an arena.
    ///
    /// A `false` result means the handle is the default/sentinel value;
    /// a `true` result says nothing about staleness — use
    /// [`Arena::contains`](crate::Arena::contains) for that.
    pub fn is_valid(&self) -> bool {
        self.generation != 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(index={}, gen={})", self.index, self.generation)
    }
}

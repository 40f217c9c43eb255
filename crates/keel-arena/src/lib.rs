//! Generation-indexed resource arenas for keel services.
//!
//! An [`Arena<T>`] is a growable, slot-reusing container addressed by
//! [`Handle`] values — `(index, generation)` pairs that detect use of
//! stale handles in O(1) without reference counting. Erasing a slot
//! bumps its generation, so a handle issued before the erase can never
//! alias the slot's next occupant.
//!
//! Arenas themselves are single-threaded containers. Arena-owning
//! services compose [`Locked<T>`] for the reader/writer discipline:
//! the owning update path mutates under [`Locked::with_unique`], while
//! cross-thread views read under [`Locked::with_shared`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod error;
pub mod handle;
pub mod lock;

pub use arena::Arena;
pub use error::ArenaError;
pub use handle::{Handle, FIRST_GENERATION};
pub use lock::Locked;

//! Core types and traits for the keel service framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared across the keel workspace:
//! the [`Progress`] counter, command batching, error types, and the
//! [`Service`] trait implemented by every state-owning service.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod error;
pub mod id;
pub mod traits;

pub use command::CommandList;
pub use error::{CommandError, SetupError};
pub use id::Progress;
pub use traits::Service;

//! Keel: generational arenas, deferred command lists, and threaded
//! service hosting for game engines.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all keel sub-crates. For most users, adding `keel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use keel::prelude::*;
//!
//! // A service owns its state; the only way to mutate it from outside
//! // is a command list executed by the service's own update pass.
//! #[derive(Default)]
//! struct Counter {
//!     value: i64,
//! }
//!
//! enum CounterCommand {
//!     Set(i64),
//! }
//!
//! impl Service for Counter {
//!     type Command = CounterCommand;
//!     fn execute(&mut self, command: CounterCommand) -> Result<(), CommandError> {
//!         match command {
//!             CounterCommand::Set(n) => self.value = n,
//!         }
//!         Ok(())
//!     }
//! }
//!
//! // Host it on a dedicated update thread.
//! let service = ServiceThread::spawn(
//!     Counter::default(),
//!     ServiceConfig::named("counter"),
//! ).unwrap();
//!
//! // Producers submit; the update thread executes; waiters block on
//! // the list's progress target.
//! let proxy = service.proxy();
//! let mut list = proxy.create_command_list();
//! list.add_command(CounterCommand::Set(42));
//! let submitted = proxy.submit(list).unwrap();
//! proxy.wait(submitted.progress()).unwrap();
//!
//! // Readers take the shared lock and only ever see completed lists.
//! assert_eq!(service.view().read(|s| s.value), 42);
//! service.shutdown();
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `keel-core` | `Service` trait, command lists, progress, core errors |
//! | [`arena`] | `keel-arena` | Generational `Arena<T>`, `Handle`, the `Locked` wrapper |
//! | [`service`] | `keel-service` | Hosting, queues, proxies/views, registry |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`keel-core`).
///
/// Contains the [`types::Service`] trait, [`types::CommandList`],
/// [`types::Progress`], and the command/setup error types.
pub use keel_core as types;

/// Generation-indexed storage (`keel-arena`).
///
/// [`arena::Arena`] hands out [`arena::Handle`]s that detect slot reuse;
/// [`arena::Locked`] is the reader/writer wrapper the hosting layer
/// builds on.
pub use keel_arena as arena;

/// Service hosting and the command protocol (`keel-service`).
///
/// [`service::ServiceHost`] for caller-driven ticking,
/// [`service::ServiceThread`] for a dedicated update thread per
/// service, and [`service::ServiceRegistry`] for typed lookup of
/// running services.
pub use keel_service as service;

/// Common imports for typical keel usage.
///
/// ```rust
/// use keel::prelude::*;
/// ```
pub mod prelude {
    pub use keel_arena::{Arena, ArenaError, Handle, Locked};
    pub use keel_core::{CommandError, CommandList, Progress, Service, SetupError};
    pub use keel_service::{
        ServiceConfig, ServiceHost, ServiceProxy, ServiceRegistry, ServiceThread, ServiceView,
        ShutdownPolicy, SubmitError, WaitError,
    };
}

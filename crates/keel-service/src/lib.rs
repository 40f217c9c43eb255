//! Service hosting and the asynchronous command protocol.
//!
//! A [`Service`](keel_core::Service) owns private mutable state (usually
//! one or more [`Arena`](keel_arena::Arena)s). Producer threads never
//! touch that state directly: they build [`CommandList`](keel_core::CommandList)s
//! through a [`ServiceProxy`] and submit them to the service's
//! [`CommandQueue`]; the owning update path drains the queue once per
//! tick and executes every list, strictly in submission order, under
//! the exclusive lock. Cross-thread reads go through a [`ServiceView`],
//! which takes the shared lock and therefore only ever observes a
//! prefix of fully-executed lists.
//!
//! ```text
//! Producer threads            Update thread              Reader threads
//!     |                            |                          |
//!     |--create_command_list()     |                          |
//!     |--submit(list)------------->| queue (FIFO, own mutex)  |
//!     |     -> Progress target     |                          |
//!     |                            | pre_update()             |
//!     |                            | update():                |
//!     |                            |   with_unique(state)     |
//!     |                            |   drain + execute lists  |
//!     |                            |   progress per list      |
//!     |                            | post_update()            |
//!     |--wait(target) <---condvar--|                          |
//!     |                            |        with_shared(state)|
//!     |                            |<------------------read()-|
//! ```
//!
//! Hosting comes in two modes, both over the same [`ServiceHost`]:
//! caller-driven ticking (call [`ServiceHost::tick`] yourself) or a
//! dedicated named thread per service ([`ServiceThread`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod progress;
pub mod queue;
pub mod registry;
pub mod runner;

pub use config::{ConfigError, ServiceConfig, ShutdownPolicy};
pub use error::{RegistryError, SubmitError, UpdateError, WaitError};
pub use host::{ServiceHost, ServiceProxy, ServiceView, ShutdownSummary};
pub use metrics::ServiceMetrics;
pub use progress::ProgressTracker;
pub use queue::{CommandQueue, SubmittedList};
pub use registry::ServiceRegistry;
pub use runner::ServiceThread;

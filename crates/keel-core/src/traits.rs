//! The [`Service`] trait: the contract every state-owning service fulfils.

use crate::error::{CommandError, SetupError};

/// A thread-affine owner of private mutable state.
///
/// A service's state is mutated only by executing submitted commands,
/// one command list at a time, under an exclusive lock held by the
/// hosting update path. Other threads reach the state through a proxy
/// (deferred writes) or a view (shared-lock reads) — never directly.
///
/// `Send + Sync` is required because views read the state from other
/// threads through the shared lock; all mutation still happens on the
/// single update path.
///
/// # Lifecycle
///
/// `setup` runs exactly once, during host construction. After that the
/// host drives the repeating tick `pre_update → execute* → post_update`
/// until shutdown, which runs `teardown` under the exclusive lock and
/// releases the state.
pub trait Service: Send + Sync + 'static {
    /// The command type this service executes. Typically an enum with
    /// one variant per operation.
    type Command: Send + 'static;

    /// One-time initialisation (allocate arenas, acquire resources).
    ///
    /// A failure here aborts host construction; the service never
    /// becomes reachable, so there is no half-initialised state.
    fn setup(&mut self) -> Result<(), SetupError> {
        Ok(())
    }

    /// Execute a single command against the private state.
    ///
    /// Runs under the exclusive lock, exactly once per command, in
    /// submission order. Returning an error aborts the rest of the
    /// command's list and the remainder of the current tick.
    fn execute(&mut self, command: Self::Command) -> Result<(), CommandError>;

    /// Per-tick bookkeeping before commands execute (e.g. begin-frame
    /// markers). No commands run here.
    fn pre_update(&mut self) {}

    /// Per-tick bookkeeping after commands execute (e.g. end-of-frame
    /// resource lifetime management).
    fn post_update(&mut self) {}

    /// Release owned resources at shutdown. Runs under the exclusive
    /// lock after the final queue drain.
    fn teardown(&mut self) {}
}

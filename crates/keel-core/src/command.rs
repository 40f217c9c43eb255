//! Ordered command batches submitted to services.
//!
//! Commands are plain data, not closures: each service defines a command
//! type (typically an enum) and executes it by pattern match. This keeps
//! deferred work inspectable and unit-testable without executing it.

use smallvec::SmallVec;

/// An ordered batch of commands for one service.
///
/// A list is append-only while the producer builds it; submission moves
/// the list into the service's queue, so it cannot be mutated afterwards.
/// The consuming service executes the whole list atomically with respect
/// to other lists — commands from two lists never interleave.
///
/// # Examples
///
/// ```
/// use keel_core::CommandList;
///
/// enum AudioCommand {
///     SetVolume(f32),
///     Stop,
/// }
///
/// let mut list = CommandList::new();
/// list.add_command(AudioCommand::SetVolume(0.5));
/// list.add_command(AudioCommand::Stop);
/// assert_eq!(list.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct CommandList<C> {
    commands: SmallVec<[C; 4]>,
}

impl<C> CommandList<C> {
    /// Create an empty command list.
    pub fn new() -> Self {
        Self {
            commands: SmallVec::new(),
        }
    }

    /// Append a command to the end of the list.
    pub fn add_command(&mut self, command: C) {
        self.commands.push(command);
    }

    /// The commands in submission order.
    pub fn commands(&self) -> &[C] {
        &self.commands
    }

    /// Number of commands in the list.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the list contains no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Consume the list, yielding commands in submission order.
    ///
    /// Used by the executing service; producers hand the list over by
    /// value at submission and never see it again.
    pub fn into_commands(self) -> impl Iterator<Item = C> {
        self.commands.into_iter()
    }
}

impl<C> Default for CommandList<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Extend<C> for CommandList<C> {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}

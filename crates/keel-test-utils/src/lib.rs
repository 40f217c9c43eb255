//! Reference services and fixtures for keel development.
//!
//! Small, deterministic [`Service`] implementations used by the
//! workspace's integration tests: a counter, an append-only ledger, and
//! an arena-backed object pool. They exist to exercise the hosting
//! machinery, not to be useful on their own.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use keel_arena::{Arena, Handle};
use keel_core::{CommandError, Service, SetupError};

/// A counter with observable lifecycle hooks.
///
/// Every hook increments its own tally, so tests can assert exactly how
/// many times setup, the frame hooks, and teardown ran.
#[derive(Debug, Default)]
pub struct CounterService {
    pub value: i64,
    pub setups: u32,
    pub pre_updates: u32,
    pub post_updates: u32,
    pub teardowns: u32,
    /// When set, `setup` fails with this reason.
    pub fail_setup: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CounterCommand {
    Add(i64),
    Set(i64),
    /// Always fails; for exercising the fail-fast path.
    Fail(String),
}

impl Service for CounterService {
    type Command = CounterCommand;

    fn setup(&mut self) -> Result<(), SetupError> {
        if let Some(reason) = &self.fail_setup {
            return Err(SetupError::new(reason.clone()));
        }
        self.setups += 1;
        Ok(())
    }

    fn execute(&mut self, command: CounterCommand) -> Result<(), CommandError> {
        match command {
            CounterCommand::Add(n) => self.value += n,
            CounterCommand::Set(n) => self.value = n,
            CounterCommand::Fail(reason) => return Err(CommandError::Failed { reason }),
        }
        Ok(())
    }

    fn pre_update(&mut self) {
        self.pre_updates += 1;
    }

    fn post_update(&mut self) {
        self.post_updates += 1;
    }

    fn teardown(&mut self) {
        self.teardowns += 1;
    }
}

/// Records every command it executes, in order.
///
/// Lets ordering tests assert the exact global execution sequence after
/// many producers have submitted concurrently.
#[derive(Debug, Default)]
pub struct LedgerService {
    pub entries: Vec<(u32, u32)>,
}

impl Service for LedgerService {
    /// `(producer id, per-producer sequence)`.
    type Command = (u32, u32);

    fn execute(&mut self, command: (u32, u32)) -> Result<(), CommandError> {
        self.entries.push(command);
        Ok(())
    }
}

/// An arena-backed object pool driven entirely by commands.
///
/// The tagged-command analogue of a resource service: spawn, despawn,
/// and in-place mutation, each validated against the pool's handles.
#[derive(Debug)]
pub struct PoolService {
    pub pool: Arena<String>,
    /// Handles issued by `Spawn`, in spawn order, for tests to replay.
    pub spawned: Vec<Handle>,
}

impl PoolService {
    pub fn bounded(capacity: usize) -> Self {
        Self {
            pool: Arena::bounded(capacity),
            spawned: Vec::new(),
        }
    }
}

impl Default for PoolService {
    fn default() -> Self {
        Self {
            pool: Arena::new(),
            spawned: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolCommand {
    Spawn(String),
    Despawn(Handle),
    Rename(Handle, String),
}

impl Service for PoolService {
    type Command = PoolCommand;

    fn execute(&mut self, command: PoolCommand) -> Result<(), CommandError> {
        match command {
            PoolCommand::Spawn(name) => {
                let handle = self.pool.add(name)?;
                self.spawned.push(handle);
                Ok(())
            }
            PoolCommand::Despawn(handle) => {
                self.pool.erase(handle)?;
                Ok(())
            }
            PoolCommand::Rename(handle, name) => {
                self.pool.set(handle, name)?;
                Ok(())
            }
        }
    }
}

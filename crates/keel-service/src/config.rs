//! Service configuration and validation.

use std::error::Error;
use std::fmt;

/// Default update rate for a [`ServiceThread`](crate::ServiceThread).
pub const DEFAULT_TICK_RATE_HZ: f64 = 60.0;

/// Default command queue capacity, in lists.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// What happens to still-queued command lists at shutdown.
///
/// Either way the outcome is observable: dropped lists wake their
/// waiters with [`WaitError::Dropped`](crate::WaitError::Dropped) and
/// are counted in the [`ShutdownSummary`](crate::ShutdownSummary).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Drop pending lists unexecuted.
    #[default]
    DropPending,
    /// Execute pending lists before teardown. A command failure during
    /// the flush stops it; whatever remains is then dropped.
    FlushPending,
}

/// Configuration for hosting one service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Service name, used for the update thread name and diagnostics.
    pub name: String,
    /// Command queue capacity in lists. Must be at least 1.
    pub queue_capacity: usize,
    /// Update rate for [`ServiceThread`](crate::ServiceThread) hosting.
    /// `None` = [`DEFAULT_TICK_RATE_HZ`]. Ignored by caller-driven
    /// ticking.
    pub tick_rate_hz: Option<f64>,
    /// Fate of pending lists at shutdown.
    pub shutdown_policy: ShutdownPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "service".into(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            tick_rate_hz: None,
            shutdown_policy: ShutdownPolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// A default configuration with the given service name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::QueueCapacityZero);
        }
        if let Some(rate) = self.tick_rate_hz {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigError::InvalidTickRate { value: rate });
            }
        }
        Ok(())
    }

    /// The effective tick rate, applying the default.
    pub(crate) fn resolved_tick_rate(&self) -> f64 {
        self.tick_rate_hz.unwrap_or(DEFAULT_TICK_RATE_HZ)
    }
}

/// Errors detected while constructing a service host.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The service name is empty.
    EmptyName,
    /// The queue capacity is zero.
    QueueCapacityZero,
    /// `tick_rate_hz` is NaN, infinite, zero, or negative.
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
    /// The service's one-time setup failed (e.g. missing dependency).
    SetupFailed {
        /// Description of the setup failure.
        reason: String,
    },
    /// The dedicated update thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "service name must not be empty"),
            Self::QueueCapacityZero => write!(f, "queue_capacity must be at least 1"),
            Self::InvalidTickRate { value } => {
                write!(f, "tick_rate_hz must be finite and positive, got {value}")
            }
            Self::SetupFailed { reason } => write!(f, "service setup failed: {reason}"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

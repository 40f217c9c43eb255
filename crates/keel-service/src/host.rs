//! Service hosting: the update path and the cross-thread capabilities.
//!
//! [`ServiceHost`] owns the update path for one service. It hands out
//! two cheap, cloneable capabilities: [`ServiceProxy`] (submit, cancel,
//! wait) for producers and [`ServiceView`] (shared-lock reads) for
//! consumers. Neither capability can mutate service state directly;
//! every write funnels through a command list executed by the host
//! under the exclusive lock, strictly in submission order.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use keel_arena::Locked;
use keel_core::{CommandList, Progress, Service};

use crate::config::{ConfigError, ServiceConfig, ShutdownPolicy};
use crate::error::{SubmitError, UpdateError, WaitError};
use crate::metrics::{MetricsInner, ServiceMetrics};
use crate::progress::{ListOutcome, ProgressTracker};
use crate::queue::{CommandQueue, SubmittedList};

/// State shared between the host and all of its proxies and views.
struct Shared<S: Service> {
    name: String,
    state: Locked<S>,
    queue: CommandQueue<S::Command>,
    progress: ProgressTracker,
    metrics: MetricsInner,
}

/// Hosts one service and drives its lifecycle.
///
/// Construction runs [`Service::setup`] exactly once, before any proxy
/// or view exists, so commands can never reach a service that has not
/// finished setting up. Dropping the host (or calling
/// [`shutdown`](ServiceHost::shutdown)) runs [`Service::teardown`]
/// exactly once and settles every unexecuted list.
///
/// The host can be ticked by the caller ([`tick`](ServiceHost::tick))
/// or moved onto a dedicated thread via
/// [`ServiceThread`](crate::ServiceThread).
pub struct ServiceHost<S: Service> {
    shared: Arc<Shared<S>>,
    policy: ShutdownPolicy,
    finalized: bool,
}

/// What happened to pending work when a service shut down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShutdownSummary {
    /// Name of the service that shut down.
    pub service: String,
    /// Lists executed during a [`ShutdownPolicy::FlushPending`] flush.
    pub flushed_lists: u64,
    /// Lists dropped unexecuted. Their waiters observed
    /// [`WaitError::Dropped`].
    pub dropped_lists: u64,
    /// The command failure that cut a flush short, if any.
    pub failure: Option<UpdateError>,
    /// Final counter snapshot.
    pub metrics: ServiceMetrics,
}

impl<S: Service> ServiceHost<S> {
    /// Validate `config`, run the service's one-time setup, and wrap it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SetupFailed`] carries the service's own reason;
    /// the service value is discarded in that case.
    pub fn new(mut service: S, config: ServiceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        service
            .setup()
            .map_err(|e| ConfigError::SetupFailed { reason: e.reason })?;
        Ok(Self {
            shared: Arc::new(Shared {
                name: config.name,
                state: Locked::new(service),
                queue: CommandQueue::new(config.queue_capacity),
                progress: ProgressTracker::new(),
                metrics: MetricsInner::default(),
            }),
            policy: config.shutdown_policy,
            finalized: false,
        })
    }

    /// The configured service name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// A write capability for producer threads.
    pub fn proxy(&self) -> ServiceProxy<S> {
        ServiceProxy {
            shared: Arc::clone(&self.shared),
        }
    }

    /// A read capability for consumer threads.
    pub fn view(&self) -> ServiceView<S> {
        ServiceView {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of lists currently queued.
    pub fn pending_lists(&self) -> usize {
        self.shared.queue.len()
    }

    /// Current counter snapshot.
    pub fn metrics(&self) -> ServiceMetrics {
        self.shared.metrics.snapshot()
    }

    /// Run one full frame: `pre_update`, queue drain, `post_update`.
    ///
    /// A command failure aborts the drain but `post_update` still runs;
    /// the frame hooks are paired regardless of command outcomes.
    pub fn tick(&mut self) -> Result<(), UpdateError> {
        self.shared.state.with_unique(|service| service.pre_update());
        let result = self.update();
        self.shared.state.with_unique(|service| service.post_update());
        result
    }

    /// Drain and execute the lists that were queued when the call
    /// began, in submission order, under one exclusive-lock span.
    ///
    /// The first command that fails settles its list as failed, leaves
    /// the not-yet-started lists queued for the next pass, and is
    /// returned. Readers blocked on the shared lock get in between
    /// passes, never between the commands of a pass.
    pub fn update(&mut self) -> Result<(), UpdateError> {
        let shared = &self.shared;
        let mut pending: VecDeque<_> = shared.queue.take_snapshot().into();
        let mut failure = None;

        shared.state.with_unique(|service| {
            while let Some(entry) = pending.pop_front() {
                let seq = entry.seq;
                for (index, command) in entry.list.into_commands().enumerate() {
                    match service.execute(command) {
                        Ok(()) => shared.metrics.add(&shared.metrics.commands_executed, 1),
                        Err(reason) => {
                            shared.metrics.add(&shared.metrics.commands_failed, 1);
                            shared
                                .progress
                                .resolve(seq, ListOutcome::Failed(reason.clone()));
                            failure = Some(UpdateError {
                                service: shared.name.clone(),
                                list: Progress(seq),
                                command_index: index,
                                reason,
                            });
                            return;
                        }
                    }
                }
                shared.progress.complete(seq);
                shared.metrics.add(&shared.metrics.lists_executed, 1);
            }
        });

        // Lists the aborted pass never started stay pending.
        shared.queue.requeue_front(Vec::from(pending));
        shared.metrics.add(&shared.metrics.updates, 1);
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stop accepting submissions, settle pending lists per the
    /// configured [`ShutdownPolicy`], and tear the service down.
    ///
    /// Every outstanding waiter is woken: with `Ok` or a command
    /// failure if its list ran during a flush, with
    /// [`WaitError::Dropped`] if its list was discarded, and with
    /// [`WaitError::Shutdown`] otherwise.
    pub fn shutdown(mut self) -> ShutdownSummary {
        self.finalize()
    }

    fn finalize(&mut self) -> ShutdownSummary {
        self.finalized = true;
        // Closing the queue shares the submission mutex, so every list
        // not refused from here on is caught by the drains below.
        self.shared.queue.close();

        let executed_before = self.shared.metrics.snapshot().lists_executed;
        let mut failure = None;
        if self.policy == ShutdownPolicy::FlushPending {
            while self.shared.queue.len() > 0 {
                if let Err(e) = self.update() {
                    failure = Some(e);
                    break;
                }
            }
        }

        let shared = &self.shared;
        let flushed_lists = shared.metrics.snapshot().lists_executed - executed_before;
        let remaining = shared.queue.take_all();
        let dropped_lists = remaining.len() as u64;
        for entry in remaining {
            shared.progress.resolve(entry.seq, ListOutcome::Dropped);
        }
        shared
            .metrics
            .add(&shared.metrics.lists_dropped, dropped_lists);

        shared.state.with_unique(|service| service.teardown());
        shared.progress.mark_shutdown();

        ShutdownSummary {
            service: shared.name.clone(),
            flushed_lists,
            dropped_lists,
            failure,
            metrics: shared.metrics.snapshot(),
        }
    }
}

impl<S: Service> Drop for ServiceHost<S> {
    fn drop(&mut self) {
        if !self.finalized {
            let _ = self.finalize();
        }
    }
}

// Manual Debug: `S::Command` need not be Debug, so the queue contents
// are elided.
impl<S: Service> std::fmt::Debug for ServiceHost<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHost")
            .field("name", &self.shared.name)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S: Service> std::fmt::Debug for ServiceProxy<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProxy")
            .field("name", &self.shared.name)
            .finish_non_exhaustive()
    }
}

impl<S: Service> std::fmt::Debug for ServiceView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceView")
            .field("name", &self.shared.name)
            .finish_non_exhaustive()
    }
}

/// Write capability: build, submit, cancel, and await command lists.
///
/// Cloning is cheap; every clone talks to the same service. A proxy
/// never touches service state itself, so holding one cannot block the
/// update path.
pub struct ServiceProxy<S: Service> {
    shared: Arc<Shared<S>>,
}

impl<S: Service> Clone for ServiceProxy<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: Service> ServiceProxy<S> {
    /// The service's name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// An empty command list for this service's command type.
    pub fn create_command_list(&self) -> CommandList<S::Command> {
        CommandList::new()
    }

    /// Submit a list for execution on the next update pass.
    ///
    /// Returns a receipt whose [`progress`](SubmittedList::progress)
    /// value can be awaited. An empty list is accepted and completes on
    /// the next pass without executing anything.
    ///
    /// # Errors
    ///
    /// [`SubmitError::QueueFull`] under back-pressure (nothing is
    /// enqueued; resubmit later), [`SubmitError::Shutdown`] once the
    /// host has started shutting down.
    pub fn submit(&self, list: CommandList<S::Command>) -> Result<SubmittedList, SubmitError> {
        let metrics = &self.shared.metrics;
        match self.shared.queue.submit(list) {
            Ok(seq) => {
                metrics.add(&metrics.lists_submitted, 1);
                Ok(SubmittedList::new(seq))
            }
            Err(e) => {
                if matches!(e, SubmitError::QueueFull { .. }) {
                    metrics.add(&metrics.queue_full_rejections, 1);
                }
                Err(e)
            }
        }
    }

    /// Cancel a still-queued list.
    ///
    /// Returns `true` if the list was removed before execution; its
    /// waiters then observe [`WaitError::Cancelled`]. Returns `false`
    /// if the list had already been taken by an update pass, in which
    /// case it runs (or ran) normally.
    pub fn cancel(&self, submitted: SubmittedList) -> bool {
        let seq = submitted.progress().0;
        if self.shared.queue.cancel(seq) {
            self.shared.progress.resolve(seq, ListOutcome::Cancelled);
            self.shared
                .metrics
                .add(&self.shared.metrics.lists_cancelled, 1);
            true
        } else {
            false
        }
    }

    /// Block until the list with the given target settles.
    pub fn wait(&self, target: Progress) -> Result<(), WaitError> {
        self.shared.progress.wait(target)
    }

    /// Block until the list settles or `timeout` elapses.
    pub fn wait_timeout(&self, target: Progress, timeout: Duration) -> Result<(), WaitError> {
        self.shared.progress.wait_timeout(target, timeout)
    }

    /// The highest fully-executed sequence number.
    pub fn completed(&self) -> Progress {
        self.shared.progress.completed()
    }

    /// Has this target settled (completed, failed, cancelled, or
    /// dropped)?
    pub fn is_settled(&self, target: Progress) -> bool {
        self.shared.progress.is_settled(target)
    }

    /// Current counter snapshot.
    pub fn metrics(&self) -> ServiceMetrics {
        self.shared.metrics.snapshot()
    }
}

/// Read capability: shared-lock access to service state.
///
/// Reads overlap freely with each other and with producers, but never
/// with an update pass, so a view only ever observes state in which
/// every started command list has fully executed.
pub struct ServiceView<S: Service> {
    shared: Arc<Shared<S>>,
}

impl<S: Service> Clone for ServiceView<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: Service> ServiceView<S> {
    /// The service's name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Run `f` with shared access to the service state.
    ///
    /// Keep the closure short: an update pass cannot start while any
    /// reader is inside it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.shared.state.with_shared(f)
    }

    /// The highest fully-executed sequence number.
    pub fn completed(&self) -> Progress {
        self.shared.progress.completed()
    }

    /// Current counter snapshot.
    pub fn metrics(&self) -> ServiceMetrics {
        self.shared.metrics.snapshot()
    }
}

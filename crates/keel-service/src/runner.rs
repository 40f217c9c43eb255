//! Dedicated update thread per service.
//!
//! [`ServiceThread`] moves a [`ServiceHost`] onto a named OS thread and
//! ticks it at the configured rate. Pacing uses `park_timeout` rather
//! than a sleep loop so a shutdown request can wake the thread
//! immediately via `unpark`. Command failures from ticks are forwarded
//! over an unbounded channel instead of tearing the thread down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use keel_core::Service;

use crate::config::{ConfigError, ServiceConfig};
use crate::error::UpdateError;
use crate::host::{ServiceHost, ServiceProxy, ServiceView, ShutdownSummary};
use crate::metrics::ServiceMetrics;

/// A service running on its own named thread.
///
/// The thread is named `{service}-service` for debugger and profiler
/// output. Dropping a `ServiceThread` without calling
/// [`shutdown`](ServiceThread::shutdown) still stops and joins the
/// thread; only the [`ShutdownSummary`] is lost.
#[derive(Debug)]
pub struct ServiceThread<S: Service> {
    proxy: ServiceProxy<S>,
    view: ServiceView<S>,
    stop: Arc<AtomicBool>,
    errors: Receiver<UpdateError>,
    handle: Option<thread::JoinHandle<ShutdownSummary>>,
}

impl<S: Service> ServiceThread<S> {
    /// Set up `service` on the calling thread, then spawn its update
    /// thread.
    ///
    /// Setup runs here so a [`ConfigError::SetupFailed`] surfaces
    /// synchronously, before any thread exists.
    pub fn spawn(service: S, config: ServiceConfig) -> Result<Self, ConfigError> {
        let interval = Duration::from_secs_f64(1.0 / config.resolved_tick_rate());
        let thread_name = format!("{}-service", config.name);

        let host = ServiceHost::new(service, config)?;
        let proxy = host.proxy();
        let view = host.view();
        let stop = Arc::new(AtomicBool::new(false));
        let (error_tx, errors) = unbounded();

        let handle = thread::Builder::new()
            .name(thread_name)
            .spawn({
                let stop = Arc::clone(&stop);
                move || run_loop(host, interval, stop, error_tx)
            })
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;

        Ok(Self {
            proxy,
            view,
            stop,
            errors,
            handle: Some(handle),
        })
    }

    /// The service's name.
    pub fn name(&self) -> &str {
        self.proxy.name()
    }

    /// A write capability for producer threads.
    pub fn proxy(&self) -> ServiceProxy<S> {
        self.proxy.clone()
    }

    /// A read capability for consumer threads.
    pub fn view(&self) -> ServiceView<S> {
        self.view.clone()
    }

    /// Current counter snapshot.
    pub fn metrics(&self) -> ServiceMetrics {
        self.proxy.metrics()
    }

    /// Command failures forwarded from the update thread since the last
    /// call, oldest first. Never blocks.
    pub fn drain_errors(&self) -> Vec<UpdateError> {
        self.errors.try_iter().collect()
    }

    /// Stop the update thread, run the host's shutdown sequence, and
    /// return its summary.
    pub fn shutdown(mut self) -> ShutdownSummary {
        self.request_stop();
        // The join only fails if the update thread panicked; a service
        // panic poisons its state lock, so propagating is the only
        // honest option.
        let handle = self.handle.take().expect("update thread already joined");
        handle.join().expect("service thread panicked")
    }

    fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
    }
}

impl<S: Service> Drop for ServiceThread<S> {
    fn drop(&mut self) {
        self.request_stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop<S: Service>(
    mut host: ServiceHost<S>,
    interval: Duration,
    stop: Arc<AtomicBool>,
    error_tx: Sender<UpdateError>,
) -> ShutdownSummary {
    while !stop.load(Ordering::SeqCst) {
        let started = Instant::now();
        if let Err(e) = host.tick() {
            // Receiver may be gone if the owner is mid-drop; the error
            // is still recorded as the list's outcome either way.
            let _ = error_tx.send(e);
        }
        let elapsed = started.elapsed();
        if elapsed < interval && !stop.load(Ordering::SeqCst) {
            thread::park_timeout(interval - elapsed);
        }
    }
    host.shutdown()
}

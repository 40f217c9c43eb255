//! Explicit registry of running services, keyed by service type.
//!
//! The registry replaces ambient singletons: whoever owns the
//! [`ServiceRegistry`] decides which services exist and for how long.
//! Lookup is by the service's concrete type, so `registry.proxy::<WindowService>()`
//! is checked at compile time to yield `ServiceProxy<WindowService>`.

use std::any::{Any, TypeId};

use indexmap::IndexMap;
use keel_core::Service;

use crate::error::RegistryError;
use crate::host::{ServiceProxy, ServiceView, ShutdownSummary};
use crate::runner::ServiceThread;

/// Type-erased view of one registered [`ServiceThread`].
trait AnyServiceThread: Send {
    fn name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
    fn shutdown_boxed(self: Box<Self>) -> ShutdownSummary;
}

impl<S: Service> AnyServiceThread for ServiceThread<S> {
    fn name(&self) -> &str {
        ServiceThread::name(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shutdown_boxed(self: Box<Self>) -> ShutdownSummary {
        (*self).shutdown()
    }
}

/// Owns a set of running services, at most one per service type.
///
/// Services shut down in reverse registration order (later services
/// may depend on earlier ones), either explicitly via
/// [`shutdown_all`](ServiceRegistry::shutdown_all) or on drop.
#[derive(Default)]
pub struct ServiceRegistry {
    services: IndexMap<TypeId, Box<dyn AnyServiceThread>>,
}

impl ServiceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a running service.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateService`] if a service of the same
    /// type is already registered; `thread` is dropped (and therefore
    /// stopped) in that case.
    pub fn insert<S: Service>(&mut self, thread: ServiceThread<S>) -> Result<(), RegistryError> {
        let key = TypeId::of::<S>();
        if let Some(existing) = self.services.get(&key) {
            return Err(RegistryError::DuplicateService {
                name: existing.name().to_string(),
            });
        }
        self.services.insert(key, Box::new(thread));
        Ok(())
    }

    /// Is a service of type `S` registered?
    pub fn contains<S: Service>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<S>())
    }

    /// A write capability for the registered `S`, if any.
    pub fn proxy<S: Service>(&self) -> Option<ServiceProxy<S>> {
        self.get::<S>().map(ServiceThread::proxy)
    }

    /// A read capability for the registered `S`, if any.
    pub fn view<S: Service>(&self) -> Option<ServiceView<S>> {
        self.get::<S>().map(ServiceThread::view)
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Registered service names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.values().map(|s| s.name())
    }

    /// Shut every service down in reverse registration order and
    /// collect their summaries (in shutdown order).
    pub fn shutdown_all(mut self) -> Vec<ShutdownSummary> {
        let mut summaries = Vec::with_capacity(self.services.len());
        while let Some((_, service)) = self.services.pop() {
            summaries.push(service.shutdown_boxed());
        }
        summaries
    }

    fn get<S: Service>(&self) -> Option<&ServiceThread<S>> {
        self.services
            .get(&TypeId::of::<S>())
            .and_then(|s| s.as_any().downcast_ref())
    }
}

impl Drop for ServiceRegistry {
    fn drop(&mut self) {
        // Reverse order, same as shutdown_all; each drop joins its
        // update thread.
        while let Some((_, service)) = self.services.pop() {
            drop(service);
        }
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use keel_core::CommandError;

    #[derive(Debug, Default)]
    struct Alpha {
        value: u32,
    }
    impl Service for Alpha {
        type Command = u32;
        fn execute(&mut self, command: u32) -> Result<(), CommandError> {
            self.value = command;
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Beta;
    impl Service for Beta {
        type Command = ();
        fn execute(&mut self, _: ()) -> Result<(), CommandError> {
            Ok(())
        }
    }

    fn fast(name: &str) -> ServiceConfig {
        ServiceConfig {
            tick_rate_hz: Some(1000.0),
            ..ServiceConfig::named(name)
        }
    }

    #[test]
    fn lookup_is_typed() {
        let mut registry = ServiceRegistry::new();
        registry
            .insert(ServiceThread::spawn(Alpha::default(), fast("alpha")).unwrap())
            .unwrap();

        assert!(registry.contains::<Alpha>());
        assert!(!registry.contains::<Beta>());
        assert!(registry.proxy::<Alpha>().is_some());
        assert!(registry.view::<Beta>().is_none());

        let proxy = registry.proxy::<Alpha>().unwrap();
        let mut list = proxy.create_command_list();
        list.add_command(7);
        let submitted = proxy.submit(list).unwrap();
        proxy.wait(submitted.progress()).unwrap();
        assert_eq!(registry.view::<Alpha>().unwrap().read(|s| s.value), 7);
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let mut registry = ServiceRegistry::new();
        registry
            .insert(ServiceThread::spawn(Alpha::default(), fast("alpha")).unwrap())
            .unwrap();
        let err = registry
            .insert(ServiceThread::spawn(Alpha::default(), fast("alpha2")).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateService {
                name: "alpha".into()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn shutdown_all_runs_in_reverse_registration_order() {
        let mut registry = ServiceRegistry::new();
        registry
            .insert(ServiceThread::spawn(Alpha::default(), fast("alpha")).unwrap())
            .unwrap();
        registry
            .insert(ServiceThread::spawn(Beta, fast("beta")).unwrap())
            .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["alpha", "beta"]);

        let summaries = registry.shutdown_all();
        let order: Vec<&str> = summaries.iter().map(|s| s.service.as_str()).collect();
        assert_eq!(order, vec!["beta", "alpha"]);
    }
}

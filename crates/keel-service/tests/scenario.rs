//! Integration test: the full producer/update/reader round trip, and a
//! registry holding several services at once.

use keel_core::Progress;
use keel_service::{ServiceConfig, ServiceRegistry, ServiceThread, WaitError};
use keel_test_utils::{CounterCommand, CounterService, PoolCommand, PoolService};
use std::thread;

fn fast(name: &str) -> ServiceConfig {
    ServiceConfig {
        tick_rate_hz: Some(2000.0),
        ..ServiceConfig::named(name)
    }
}

/// A producer thread writes 42 through the command protocol; after its
/// list completes, a reader thread sees 42 through a view.
#[test]
fn deferred_write_becomes_visible_after_completion() {
    let service = ServiceThread::spawn(CounterService::default(), fast("counter")).unwrap();

    let producer = {
        let proxy = service.proxy();
        thread::spawn(move || {
            let mut list = proxy.create_command_list();
            list.add_command(CounterCommand::Set(42));
            let submitted = proxy.submit(list).unwrap();
            proxy.wait(submitted.progress()).unwrap();
            submitted.progress()
        })
    };
    let target = producer.join().unwrap();

    let reader = {
        let view = service.view();
        thread::spawn(move || {
            assert!(view.completed() >= target);
            view.read(|s| s.value)
        })
    };
    assert_eq!(reader.join().unwrap(), 42);

    let summary = service.shutdown();
    assert_eq!(summary.metrics.lists_executed, 1);
}

/// Spawn, mutate, and despawn pooled objects across ticks; a handle
/// that outlives its object is rejected, and the slot's reuse is
/// invisible to the stale holder.
#[test]
fn pooled_objects_reject_stale_handles_across_ticks() {
    let service = ServiceThread::spawn(PoolService::default(), fast("pool")).unwrap();
    let proxy = service.proxy();
    let view = service.view();

    let mut list = proxy.create_command_list();
    list.add_command(PoolCommand::Spawn("crate".into()));
    list.add_command(PoolCommand::Spawn("barrel".into()));
    let submitted = proxy.submit(list).unwrap();
    proxy.wait(submitted.progress()).unwrap();

    let crate_handle = view.read(|s| s.spawned[0]);

    let mut list = proxy.create_command_list();
    list.add_command(PoolCommand::Despawn(crate_handle));
    list.add_command(PoolCommand::Spawn("keg".into()));
    let submitted = proxy.submit(list).unwrap();
    proxy.wait(submitted.progress()).unwrap();

    // The keg reused the crate's slot under a newer generation.
    let keg_handle = view.read(|s| s.spawned[2]);
    assert_eq!(keg_handle.index(), crate_handle.index());
    assert!(keg_handle.generation() > crate_handle.generation());

    // Renaming through the stale handle fails its list; the keg is
    // untouched.
    let mut list = proxy.create_command_list();
    list.add_command(PoolCommand::Rename(crate_handle, "mimic".into()));
    let submitted = proxy.submit(list).unwrap();
    assert!(matches!(
        proxy.wait(submitted.progress()),
        Err(WaitError::CommandFailed(_))
    ));
    assert_eq!(
        view.read(|s| s.pool.get(keg_handle).cloned().unwrap()),
        "keg"
    );

    // The forwarded error trails the waiter wake-up by a tick at most.
    let mut errors = service.drain_errors();
    for _ in 0..50 {
        if !errors.is_empty() {
            break;
        }
        thread::sleep(std::time::Duration::from_millis(2));
        errors = service.drain_errors();
    }
    assert_eq!(errors.len(), 1);
    service.shutdown();
}

/// Two services under one registry: typed lookup routes each command
/// stream to the right service, and teardown runs newest-first.
#[test]
fn registry_routes_by_type_and_tears_down_in_reverse() {
    let mut registry = ServiceRegistry::new();
    registry
        .insert(ServiceThread::spawn(CounterService::default(), fast("counter")).unwrap())
        .unwrap();
    registry
        .insert(ServiceThread::spawn(PoolService::default(), fast("pool")).unwrap())
        .unwrap();

    let counter = registry.proxy::<CounterService>().unwrap();
    let pool = registry.proxy::<PoolService>().unwrap();

    let mut list = counter.create_command_list();
    list.add_command(CounterCommand::Add(7));
    let counter_done = counter.submit(list).unwrap();

    let mut list = pool.create_command_list();
    list.add_command(PoolCommand::Spawn("crate".into()));
    let pool_done = pool.submit(list).unwrap();

    counter.wait(counter_done.progress()).unwrap();
    pool.wait(pool_done.progress()).unwrap();

    assert_eq!(
        registry.view::<CounterService>().unwrap().read(|s| s.value),
        7
    );
    assert_eq!(registry.view::<PoolService>().unwrap().read(|s| s.pool.len()), 1);

    let summaries = registry.shutdown_all();
    let order: Vec<&str> = summaries.iter().map(|s| s.service.as_str()).collect();
    assert_eq!(order, vec!["pool", "counter"]);
    assert!(summaries.iter().all(|s| s.failure.is_none()));
}

/// Progress values from different services are independent counters.
#[test]
fn progress_is_per_service() {
    let a = ServiceThread::spawn(CounterService::default(), fast("a")).unwrap();
    let b = ServiceThread::spawn(CounterService::default(), fast("b")).unwrap();

    let proxy_a = a.proxy();
    let proxy_b = b.proxy();

    let mut list = proxy_a.create_command_list();
    list.add_command(CounterCommand::Add(1));
    let first_a = proxy_a.submit(list).unwrap();

    let mut list = proxy_b.create_command_list();
    list.add_command(CounterCommand::Add(1));
    let first_b = proxy_b.submit(list).unwrap();

    // Both services start their sequence at the same value.
    assert_eq!(first_a.progress(), Progress(1));
    assert_eq!(first_b.progress(), Progress(1));

    proxy_a.wait(first_a.progress()).unwrap();
    proxy_b.wait(first_b.progress()).unwrap();
    a.shutdown();
    b.shutdown();
}

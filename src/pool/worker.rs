//! Worker group: the threads that apply the processor to each item

use crate::core::{ItemError, Outcome, PoolError, Processor, Result, WorkItem};
use crate::pool::config::WorkerPoolConfig;
use crate::pool::stats::WorkerStats;
use crate::queue::{QueueReceiver, QueueSender};
use log::{debug, error, warn};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Instant;

#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// What the worker group orchestration observed
#[derive(Debug)]
pub(crate) struct WorkerGroupReport {
    /// Workers that were actually started
    pub spawned: usize,
    /// First spawn failure, if any
    pub spawn_error: Option<PoolError>,
}

/// Spawn a named thread inside `scope`
pub(crate) fn spawn_named<'scope, 'env, F, R>(
    scope: &'scope Scope<'scope, 'env>,
    name: String,
    stack_size: Option<usize>,
    f: F,
) -> Result<ScopedJoinHandle<'scope, R>>
where
    F: FnOnce() -> R + Send + 'scope,
    R: Send + 'scope,
{
    let mut builder = thread::Builder::new().name(name.clone());
    if let Some(size) = stack_size {
        builder = builder.stack_size(size);
    }

    builder
        .spawn_scoped(scope, f)
        .map_err(|e| {
            error!("failed to spawn thread '{}': {}", name, e);
            PoolError::spawn_with_source(name, e)
        })
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Spawn one worker per configured slot, wait for all of them, then close
/// the result channel.
///
/// Runs on its own thread. The result channel is closed here and only here,
/// after every worker has returned, so no outcome can be sent after the
/// collector sees end-of-input.
pub(crate) fn run_worker_group<'scope, 'env, T, E, P>(
    scope: &'scope Scope<'scope, 'env>,
    config: &'env WorkerPoolConfig,
    processor: &'env P,
    stats: &'env [WorkerStats],
    items: QueueReceiver<WorkItem<T>>,
    results: QueueSender<Outcome<T, E>>,
) -> WorkerGroupReport
where
    T: Send + 'scope,
    E: Send + 'scope,
    P: Processor<T, E>,
{
    debug!("spawning {} workers", config.num_workers);

    let mut handles = Vec::with_capacity(config.num_workers);
    let mut spawn_error = None;

    for (id, worker_stats) in stats.iter().enumerate().take(config.num_workers) {
        let items = items.clone();
        let results = results.clone();
        match spawn_named(scope, config.thread_name(id), config.stack_size, move || {
            run_worker(id, processor, items, results, worker_stats)
        }) {
            Ok(handle) => {
                debug!("spawned worker {}", id);
                handles.push((id, handle));
            }
            Err(e) => {
                if spawn_error.is_none() {
                    spawn_error = Some(e);
                }
            }
        }
    }

    // Workers hold their own handles; dropping ours lets the allocator notice
    // if no worker could be started at all.
    drop(items);

    let spawned = handles.len();
    if spawned < config.num_workers {
        warn!(
            "only {}/{} workers could be spawned",
            spawned, config.num_workers
        );
    }
    debug!("done spawning {} workers", spawned);

    for (id, handle) in handles {
        if let Err(panic_info) = handle.join() {
            error!(
                "worker {} terminated abnormally: {}",
                id,
                panic_message(panic_info.as_ref())
            );
        }
    }

    debug!("all workers done, closing result channel");
    results.close();

    WorkerGroupReport {
        spawned,
        spawn_error,
    }
}

/// Main worker loop
///
/// Pulls items until the item queue is closed and empty. Each item yields
/// exactly one outcome on the result channel.
fn run_worker<T, E, P>(
    id: usize,
    processor: &P,
    items: QueueReceiver<WorkItem<T>>,
    results: QueueSender<Outcome<T, E>>,
    stats: &WorkerStats,
) where
    P: Processor<T, E>,
{
    #[cfg(feature = "tracing")]
    let worker_span = span!(Level::DEBUG, "worker", id = id);
    #[cfg(feature = "tracing")]
    let _guard = worker_span.enter();

    debug!("worker {} starting", id);

    while let Ok(item) = items.recv() {
        let item_id = item.id();
        debug!("worker {} working on item {}", id, item_id);

        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_worker_busy(id);

        let outcome = process_item(id, item, processor, stats);

        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_worker_idle(id);

        if results.send(outcome).is_err() {
            error!(
                "worker {}: result channel closed, outcome for item {} lost",
                id, item_id
            );
            break;
        }
        debug!("worker {} done with item {}", id, item_id);
    }

    debug!(
        "worker {} done ({} items, {} failed, avg {:.2}us)",
        id,
        stats.get_items_processed(),
        stats.get_items_failed(),
        stats.get_average_processing_time_us()
    );
}

/// Run the processor on one item with panic protection
fn process_item<T, E, P>(
    worker_id: usize,
    item: WorkItem<T>,
    processor: &P,
    stats: &WorkerStats,
) -> Outcome<T, E>
where
    P: Processor<T, E>,
{
    #[cfg(feature = "tracing")]
    let item_span = span!(Level::DEBUG, "process_item", item_id = item.id());
    #[cfg(feature = "tracing")]
    let _item_guard = item_span.enter();

    let start = Instant::now();
    let panic_result = catch_unwind(AssertUnwindSafe(|| processor.process(item.payload())));
    let elapsed = start.elapsed();

    stats.increment_processed();
    stats.add_processing_time(elapsed);

    match panic_result {
        Ok(Ok(())) => {
            #[cfg(feature = "tracing")]
            crate::tracing::metrics::record_item(elapsed, true);
            Outcome::success(item)
        }
        Ok(Err(e)) => {
            #[cfg(feature = "tracing")]
            crate::tracing::metrics::record_item(elapsed, false);
            stats.increment_failed();
            Outcome::failure(item, e)
        }
        Err(panic_info) => {
            let message = panic_message(panic_info.as_ref());
            warn!(
                "worker {}: processor panicked on item {}: {}",
                worker_id,
                item.id(),
                message
            );
            #[cfg(feature = "tracing")]
            crate::tracing::metrics::record_panic(elapsed);
            stats.increment_panicked();
            Outcome::new(item, Some(ItemError::Panicked { worker_id, message }))
        }
    }
}

//! Worker pool controller

use crate::core::{Outcome, PoolError, Processor, Result, ResultHandler, WorkItem};
use crate::pool::allocator::allocate;
use crate::pool::collector::{collect, CollectorReport};
use crate::pool::completion::Completion;
use crate::pool::config::WorkerPoolConfig;
use crate::pool::stats::{RunSummary, WorkerStats};
use crate::pool::worker::{panic_message, run_worker_group, spawn_named, WorkerGroupReport};
use crate::queue::{bounded, QueueReceiver, QueueSender};
use chrono::Utc;
use log::{info, warn};
use parking_lot::Mutex;
use std::fmt;
use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;
use uuid::Uuid;

/// Both bounded queues, allocated at construction and consumed by the run
struct PoolQueues<T, E> {
    item_tx: QueueSender<WorkItem<T>>,
    item_rx: QueueReceiver<WorkItem<T>>,
    result_tx: QueueSender<Outcome<T, E>>,
    result_rx: QueueReceiver<Outcome<T, E>>,
}

impl<T, E> PoolQueues<T, E> {
    fn new(capacity: usize) -> Self {
        let (item_tx, item_rx) = bounded(capacity);
        let (result_tx, result_rx) = bounded(capacity);
        Self {
            item_tx,
            item_rx,
            result_tx,
            result_rx,
        }
    }
}

/// A single-use pool that runs one batch of items through a processor and
/// a result handler.
///
/// # Pipeline
///
/// `start` runs three kinds of threads side by side:
///
/// - one **allocator** that tags each input element with its position and
///   pushes it onto the item queue, then closes it;
/// - `num_workers` **workers** that pull items, call the [`Processor`] and
///   push one [`Outcome`] per item onto the result channel. The group closes
///   the result channel once every worker has exited;
/// - one **collector** that hands each outcome to the [`ResultHandler`] and
///   fires the [`Completion`] signal after the channel is drained.
///
/// Both queues are bounded (by default to `num_workers`), so a slow stage
/// throttles the ones feeding it.
///
/// # Single use
///
/// A pool runs exactly one batch. A second `start` returns
/// [`PoolError::AlreadyStarted`].
///
/// # Example
///
/// ```rust
/// use batch_worker_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = WorkerPool::new(2)?;
/// let mut failures = Vec::new();
///
/// let summary = pool.start(
///     vec!["a", "b", "c"],
///     |payload: &&str| if *payload == "b" { Err("rejected") } else { Ok(()) },
///     |outcome: Outcome<&str, &str>| -> std::result::Result<(), String> {
///         if let Some(err) = outcome.processor_error() {
///             failures.push((outcome.id(), *err));
///         }
///         Ok(())
///     },
/// )?;
///
/// assert!(pool.is_completed());
/// assert_eq!(summary.outcomes_handled, 3);
/// assert_eq!(failures, vec![(1, "rejected")]);
/// # Ok(())
/// # }
/// ```
pub struct WorkerPool<T, E> {
    config: WorkerPoolConfig,
    run_id: Uuid,
    queues: Mutex<Option<PoolQueues<T, E>>>,
    completion: Completion,
}

impl<T, E> fmt::Debug for WorkerPool<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .field("run_id", &self.run_id)
            .field("started", &self.queues.lock().is_none())
            .field("completed", &self.completion.is_completed())
            .finish()
    }
}

impl<T, E> WorkerPool<T, E> {
    /// Create a pool with `num_workers` workers and default settings
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if `num_workers` is 0.
    pub fn new(num_workers: usize) -> Result<Self> {
        Self::with_config(WorkerPoolConfig::new(num_workers))
    }

    /// Create a pool with custom configuration
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the configuration is invalid.
    pub fn with_config(config: WorkerPoolConfig) -> Result<Self> {
        config.validate()?;

        let queues = PoolQueues::new(config.effective_queue_capacity());
        let run_id = Uuid::new_v4();
        info!(
            "[worker pool {}] created with {} workers",
            run_id, config.num_workers
        );

        Ok(Self {
            config,
            run_id,
            queues: Mutex::new(Some(queues)),
            completion: Completion::new(),
        })
    }

    /// Get the number of worker threads
    pub fn num_workers(&self) -> usize {
        self.config.num_workers
    }

    /// Get the pool configuration
    pub fn config(&self) -> &WorkerPoolConfig {
        &self.config
    }

    /// Identifier used in this pool's log records and run summary
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Check whether the batch has been started
    pub fn is_started(&self) -> bool {
        self.queues.lock().is_none()
    }

    /// Check whether every outcome of the run has been handled
    ///
    /// `false` until the collector has drained the result channel, `true`
    /// from then on. Safe to call from any thread at any time.
    ///
    /// A run cut short by a spawn failure after the collector started also
    /// reads `true`: the collector drains the closed channel and fires the
    /// signal, even though `start` returned [`PoolError::SpawnError`] and
    /// nothing may have been processed. Use the value `start` returned to
    /// tell the two apart.
    pub fn is_completed(&self) -> bool {
        self.completion.is_completed()
    }

    /// A handle on the completion signal that other threads can wait on
    pub fn completion(&self) -> Completion {
        self.completion.clone()
    }
}

impl<T: Send, E: Send> WorkerPool<T, E> {
    /// Run `items` through `processor` and hand every outcome to `handler`
    ///
    /// Blocks until every item has been processed and every outcome handled.
    /// The processor is shared by all workers and runs concurrently with
    /// itself; the handler runs on a single thread, one outcome at a time.
    /// Both may borrow from the caller: no pool thread outlives this call.
    ///
    /// Processor errors and panics are reported per item through
    /// [`Outcome::error`]; they never stop the run.
    ///
    /// # Errors
    ///
    /// - [`PoolError::AlreadyStarted`] if the pool already ran its batch
    /// - [`PoolError::SpawnError`] if a pool thread could not be started.
    ///   The run still finishes when at least one worker started.
    pub fn start<I, P, H, X>(&self, items: I, processor: P, handler: H) -> Result<RunSummary>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send,
        P: Fn(&T) -> std::result::Result<(), E> + Sync,
        H: FnMut(Outcome<T, E>) -> std::result::Result<(), X> + Send,
        X: fmt::Display,
    {
        self.start_with(items, processor, handler)
    }

    /// Like [`start`](Self::start), for any [`Processor`] and [`ResultHandler`]
    /// implementation
    ///
    /// # Errors
    ///
    /// Same as [`start`](Self::start).
    pub fn start_with<I, P, H>(&self, items: I, processor: P, handler: H) -> Result<RunSummary>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send,
        P: Processor<T, E>,
        H: ResultHandler<T, E>,
    {
        let PoolQueues {
            item_tx,
            item_rx,
            result_tx,
            result_rx,
        } = self
            .queues
            .lock()
            .take()
            .ok_or_else(|| PoolError::already_started(self.run_id))?;

        let started_at = Utc::now();
        let clock = Instant::now();
        info!(
            "[worker pool {}] starting at {} with {} workers",
            self.run_id, started_at, self.config.num_workers
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_run_start(self.config.num_workers, self.run_id);

        let stats: Vec<WorkerStats> = (0..self.config.num_workers)
            .map(|_| WorkerStats::new())
            .collect();

        let items = items.into_iter();
        let config = &self.config;
        let completion = &self.completion;
        let processor = &processor;
        let worker_stats = stats.as_slice();

        let (items_submitted, group, collected, elapsed) = thread::scope(|s| {
            // Downstream stages first, so a failed spawn never leaves an
            // upstream stage blocked on a queue nobody drains.
            let collector = spawn_named(s, config.thread_name("collector"), None, move || {
                collect(result_rx, handler, completion)
            })?;
            let group = spawn_named(s, config.thread_name("workers"), None, move || {
                run_worker_group(s, config, processor, worker_stats, item_rx, result_tx)
            })?;
            let allocator = spawn_named(s, config.thread_name("allocator"), None, move || {
                allocate(items, item_tx)
            })?;

            completion.wait();
            let elapsed = clock.elapsed();

            let items_submitted = join_stage(allocator, "allocator")?;
            let group: WorkerGroupReport = join_stage(group, "worker group")?;
            let collected: CollectorReport = join_stage(collector, "collector")?;
            Ok::<_, PoolError>((items_submitted, group, collected, elapsed))
        })?;

        if group.spawned == 0 {
            return Err(group.spawn_error.unwrap_or_else(|| {
                PoolError::spawn(config.thread_name("workers"), "no worker thread started")
            }));
        }
        if let Some(e) = &group.spawn_error {
            warn!(
                "[worker pool {}] ran with {}/{} workers: {}",
                self.run_id, group.spawned, self.config.num_workers, e
            );
        }

        let summary = RunSummary {
            run_id: self.run_id,
            started_at,
            elapsed,
            worker_count: group.spawned,
            items_submitted,
            outcomes_handled: collected.outcomes_handled,
            items_failed: collected.items_failed,
            items_panicked: collected.items_panicked,
            handler_errors: collected.handler_errors,
            handler_panics: collected.handler_panics,
            workers: stats
                .iter()
                .enumerate()
                .take(group.spawned)
                .map(|(id, s)| s.snapshot(id))
                .collect(),
        };

        info!(
            "[worker pool {}] total time taken: {:.6} seconds ({} outcomes, {} failed)",
            self.run_id,
            elapsed.as_secs_f64(),
            summary.outcomes_handled,
            summary.items_failed + summary.items_panicked
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_run_finish(
            summary.outcomes_handled,
            summary.items_failed + summary.items_panicked,
        );

        Ok(summary)
    }
}

/// Join a pipeline stage, turning an escaped panic into an error
fn join_stage<R>(handle: ScopedJoinHandle<'_, R>, stage: &str) -> Result<R> {
    handle.join().map_err(|panic_info| {
        PoolError::other(format!(
            "{} thread panicked: {}",
            stage,
            panic_message(panic_info.as_ref())
        ))
    })
}

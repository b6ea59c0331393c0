//! Tracing integration for observability.
//!
//! With the `tracing` feature enabled, workers run inside `worker` spans,
//! each item inside a `process_item` span, and the pool emits counter and
//! gauge events that a metrics layer can aggregate.
//!
//! # Example
//!
//! ```rust,ignore
//! use batch_worker_pool::prelude::*;
//! use batch_worker_pool::tracing::TracedProcessor;
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env()
//!         .add_directive("batch_worker_pool=debug".parse().unwrap()))
//!     .init();
//!
//! let span = tracing::info_span!("import", source = "feed.csv");
//! let _guard = span.enter();
//!
//! // The processor runs on worker threads but inside the `import` span
//! let pool = WorkerPool::new(4)?;
//! pool.start_with(rows, TracedProcessor::new(parse_row), handle_row)?;
//! ```

use crate::core::Processor;

/// A processor wrapper that carries the caller's tracing context onto the
/// worker threads.
///
/// The span current at construction time is entered around every
/// `process` call. Without the `tracing` feature this is a plain
/// pass-through.
pub struct TracedProcessor<P> {
    inner: P,
    #[cfg(feature = "tracing")]
    span: tracing::Span,
}

impl<P> TracedProcessor<P> {
    /// Wrap `processor`, capturing the current span
    pub fn new(processor: P) -> Self {
        Self {
            inner: processor,
            #[cfg(feature = "tracing")]
            span: tracing::Span::current(),
        }
    }

    /// Wrap `processor` with a specific span
    #[cfg(feature = "tracing")]
    pub fn with_span(processor: P, span: tracing::Span) -> Self {
        Self {
            inner: processor,
            span,
        }
    }

    /// Unwrap the inner processor
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<T, E, P: Processor<T, E>> Processor<T, E> for TracedProcessor<P> {
    fn process(&self, payload: &T) -> Result<(), E> {
        #[cfg(feature = "tracing")]
        let _guard = self.span.enter();
        self.inner.process(payload)
    }
}

/// Metrics recording functions for observability.
///
/// These functions emit tracing events that can be consumed by
/// metrics collection systems like Prometheus via tracing-opentelemetry.
#[cfg(feature = "tracing")]
pub mod metrics {
    use std::time::Duration;
    use uuid::Uuid;

    /// Records an item entering the item queue.
    #[inline]
    pub fn record_allocation(queue_depth: usize) {
        tracing::trace!(
            counter.items_allocated = 1,
            gauge.item_queue_depth = queue_depth as i64,
            "item allocated"
        );
    }

    /// Records one processor call with timing.
    #[inline]
    pub fn record_item(duration: Duration, success: bool) {
        let duration_ms = duration.as_millis() as u64;
        if success {
            tracing::trace!(
                counter.items_succeeded = 1,
                histogram.item_duration_ms = duration_ms,
                "item processed"
            );
        } else {
            tracing::trace!(
                counter.items_failed = 1,
                histogram.item_duration_ms = duration_ms,
                "item failed"
            );
        }
    }

    /// Records a processor panic.
    #[inline]
    pub fn record_panic(duration: Duration) {
        tracing::trace!(
            counter.items_panicked = 1,
            histogram.item_duration_ms = duration.as_millis() as u64,
            "processor panicked"
        );
    }

    /// Records worker becoming busy.
    #[inline]
    pub fn record_worker_busy(worker_id: usize) {
        tracing::trace!(gauge.workers_busy = 1, worker_id = worker_id, "worker busy");
    }

    /// Records worker becoming idle.
    #[inline]
    pub fn record_worker_idle(worker_id: usize) {
        tracing::trace!(
            gauge.workers_busy = -1i64,
            worker_id = worker_id,
            "worker idle"
        );
    }

    /// Records the start of a run.
    #[inline]
    pub fn record_run_start(num_workers: usize, run_id: Uuid) {
        tracing::info!(
            workers = num_workers,
            run_id = %run_id,
            "worker pool run started"
        );
    }

    /// Records the end of a run.
    #[inline]
    pub fn record_run_finish(outcomes_handled: u64, items_failed: u64) {
        tracing::info!(
            outcomes_handled = outcomes_handled,
            items_failed = items_failed,
            "worker pool run complete"
        );
    }
}

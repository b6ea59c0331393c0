//! Per-worker statistics and run summaries

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    items_processed: AtomicU64,
    items_failed: AtomicU64,
    items_panicked: AtomicU64,
    total_processing_time_us: AtomicU64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment items processed counter
    pub fn increment_processed(&self) {
        self.items_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment items failed counter
    pub fn increment_failed(&self) {
        self.items_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment items panicked counter
    pub fn increment_panicked(&self) {
        self.items_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Add processing time
    pub fn add_processing_time(&self, duration: Duration) {
        self.total_processing_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// Get total items processed, failed and panicked ones included
    pub fn get_items_processed(&self) -> u64 {
        self.items_processed.load(Ordering::Relaxed)
    }

    /// Get total items whose processor returned an error
    pub fn get_items_failed(&self) -> u64 {
        self.items_failed.load(Ordering::Relaxed)
    }

    /// Get total items whose processor panicked
    pub fn get_items_panicked(&self) -> u64 {
        self.items_panicked.load(Ordering::Relaxed)
    }

    /// Get average processing time per item in microseconds
    pub fn get_average_processing_time_us(&self) -> f64 {
        let total = self.total_processing_time_us.load(Ordering::Relaxed);
        let count = self.items_processed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Take a plain-value copy of the counters
    pub fn snapshot(&self, worker_id: usize) -> WorkerStatSnapshot {
        WorkerStatSnapshot {
            worker_id,
            items_processed: self.get_items_processed(),
            items_failed: self.get_items_failed(),
            items_panicked: self.get_items_panicked(),
            total_processing_time_us: self.total_processing_time_us.load(Ordering::Relaxed),
        }
    }
}

/// Counters of one worker at the end of a run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WorkerStatSnapshot {
    /// Worker index, `0..num_workers`
    pub worker_id: usize,
    /// Items this worker pulled from the queue
    pub items_processed: u64,
    /// Items whose processor returned an error
    pub items_failed: u64,
    /// Items whose processor panicked
    pub items_panicked: u64,
    /// Time spent inside the processor
    pub total_processing_time_us: u64,
}

/// Report returned by [`WorkerPool::start`](crate::pool::WorkerPool::start)
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    /// Identifier of the pool that ran the batch
    pub run_id: Uuid,
    /// Wall-clock time the run began
    pub started_at: DateTime<Utc>,
    /// Time from start until the completion signal fired
    pub elapsed: Duration,
    /// Workers that were spawned for the run
    pub worker_count: usize,
    /// Items the allocator put on the item queue
    pub items_submitted: u64,
    /// Outcomes delivered to the result handler
    pub outcomes_handled: u64,
    /// Outcomes carrying a processor error
    pub items_failed: u64,
    /// Outcomes for which the processor panicked
    pub items_panicked: u64,
    /// Handler calls that returned an error
    pub handler_errors: u64,
    /// Handler calls that panicked
    pub handler_panics: u64,
    /// Per-worker counters
    pub workers: Vec<WorkerStatSnapshot>,
}

impl RunSummary {
    /// Check that every submitted item reached the result handler
    pub fn is_complete(&self) -> bool {
        self.items_submitted == self.outcomes_handled
    }

    /// Items processed without error
    pub fn items_succeeded(&self) -> u64 {
        self.outcomes_handled - self.items_failed - self.items_panicked
    }

    /// Render the summary as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_stats_counters() {
        let stats = WorkerStats::new();
        stats.increment_processed();
        stats.increment_processed();
        stats.increment_failed();
        stats.increment_panicked();
        stats.add_processing_time(Duration::from_micros(30));
        stats.add_processing_time(Duration::from_micros(10));

        assert_eq!(stats.get_items_processed(), 2);
        assert_eq!(stats.get_items_failed(), 1);
        assert_eq!(stats.get_items_panicked(), 1);
        assert_eq!(stats.get_average_processing_time_us(), 20.0);

        let snapshot = stats.snapshot(5);
        assert_eq!(snapshot.worker_id, 5);
        assert_eq!(snapshot.items_processed, 2);
        assert_eq!(snapshot.total_processing_time_us, 40);
    }

    #[test]
    fn test_average_without_items() {
        assert_eq!(WorkerStats::new().get_average_processing_time_us(), 0.0);
    }

    #[test]
    fn test_summary_json() {
        let summary = RunSummary {
            run_id: Uuid::nil(),
            started_at: Utc::now(),
            elapsed: Duration::from_millis(5),
            worker_count: 2,
            items_submitted: 3,
            outcomes_handled: 3,
            items_failed: 1,
            items_panicked: 0,
            handler_errors: 0,
            handler_panics: 0,
            workers: vec![WorkerStats::new().snapshot(0)],
        };

        assert!(summary.is_complete());
        assert_eq!(summary.items_succeeded(), 2);

        let json: serde_json::Value =
            serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["items_submitted"], 3);
        assert_eq!(json["workers"][0]["worker_id"], 0);
        assert_eq!(json["run_id"], "00000000-0000-0000-0000-000000000000");
    }
}

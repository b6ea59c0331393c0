//! Worker pool configuration

use crate::core::{PoolError, Result};

/// Configuration for a [`WorkerPool`](crate::pool::WorkerPool)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerPoolConfig {
    /// Number of worker threads
    pub num_workers: usize,
    /// Capacity of the item queue and the result channel.
    /// `None` sizes both to `num_workers`.
    pub queue_capacity: Option<usize>,
    /// Thread name prefix
    pub thread_name_prefix: String,
    /// Stack size of worker threads in bytes. `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            queue_capacity: None,
            thread_name_prefix: "pool".to_string(),
            stack_size: None,
        }
    }
}

impl WorkerPoolConfig {
    /// Create a new configuration with specified number of workers
    ///
    /// Zero is kept as given and rejected by [`validate`](Self::validate).
    #[must_use]
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers,
            ..Default::default()
        }
    }

    /// Set the capacity of both bounded queues
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the stack size of worker threads
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// Capacity the queues will be created with
    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(self.num_workers)
    }

    /// Name of the thread running the given role
    pub(crate) fn thread_name(&self, role: impl std::fmt::Display) -> String {
        format!("{}-{}", self.thread_name_prefix, role)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(PoolError::invalid_config(
                "num_workers",
                "Number of workers must be greater than 0",
            ));
        }
        if self.effective_queue_capacity() == 0 {
            return Err(PoolError::invalid_config(
                "queue_capacity",
                "Queue capacity must be greater than 0",
            ));
        }
        Ok(())
    }
}

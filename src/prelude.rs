//! Convenient re-exports for common types and traits

pub use crate::core::{
    ItemError, Outcome, PoolError, Processor, Result, ResultHandler, WorkItem,
};
pub use crate::pool::{Completion, RunSummary, WorkerPool, WorkerPoolConfig};

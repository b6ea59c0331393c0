//! Worker pool: allocator, worker group, collector and their controller

mod allocator;
mod collector;
pub mod completion;
pub mod config;
pub mod stats;
mod worker;
pub mod worker_pool;

pub use completion::Completion;
pub use config::WorkerPoolConfig;
pub use stats::{RunSummary, WorkerStatSnapshot, WorkerStats};
pub use worker_pool::WorkerPool;

//! # Batch Worker Pool
//!
//! A bounded fan-out/fan-in worker pool that runs one batch of items through
//! caller-supplied callbacks.
//!
//! ## Features
//!
//! - **Fan-out**: a fixed number of worker threads pull items from a shared bounded queue
//! - **Fan-in**: every outcome is funnelled to a single result handler thread
//! - **Backpressure**: both queues are bounded, by default to the worker count
//! - **Exactly once**: every item yields exactly one outcome, tagged with its input position
//! - **Panic isolation**: a panicking processor fails its own item, not the run
//! - **Completion signal**: `start` blocks until every outcome has been handled
//! - **Type Safety**: generic over the payload and error types
//!
//! ## Quick Start
//!
//! ```rust
//! use batch_worker_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = WorkerPool::new(4)?;
//!
//! let summary = pool.start(
//!     1..=10u64,
//!     |n: &u64| if n % 7 == 0 { Err(format!("{} is unlucky", n)) } else { Ok(()) },
//!     |outcome: Outcome<u64, String>| -> std::result::Result<(), String> {
//!         if let Some(err) = outcome.error() {
//!             println!("item {} failed: {}", outcome.id(), err);
//!         }
//!         Ok(())
//!     },
//! )?;
//!
//! assert!(pool.is_completed());
//! assert_eq!(summary.outcomes_handled, 10);
//! assert_eq!(summary.items_failed, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use batch_worker_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = WorkerPoolConfig::new(8)
//!     .with_queue_capacity(32)
//!     .with_thread_name_prefix("thumbnails");
//!
//! let pool: WorkerPool<String, std::io::Error> = WorkerPool::with_config(config)?;
//! assert_eq!(pool.num_workers(), 8);
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Processors
//!
//! ```rust
//! use batch_worker_pool::prelude::*;
//!
//! struct Checksum {
//!     expected_len: usize,
//! }
//!
//! impl Processor<Vec<u8>, String> for Checksum {
//!     fn process(&self, payload: &Vec<u8>) -> std::result::Result<(), String> {
//!         if payload.len() == self.expected_len {
//!             Ok(())
//!         } else {
//!             Err(format!("expected {} bytes, got {}", self.expected_len, payload.len()))
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let pool = WorkerPool::new(2)?;
//! let mut bad = 0;
//! pool.start_with(
//!     vec![vec![0u8; 4], vec![0u8; 3]],
//!     Checksum { expected_len: 4 },
//!     |outcome: Outcome<Vec<u8>, String>| {
//!         if !outcome.is_success() {
//!             bad += 1;
//!         }
//!         Ok::<(), String>(())
//!     },
//! )?;
//! assert_eq!(bad, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
pub mod tracing;

pub use self::core::{ItemError, Outcome, PoolError, Processor, Result, ResultHandler, WorkItem};
pub use pool::{Completion, RunSummary, WorkerPool, WorkerPoolConfig, WorkerStatSnapshot};

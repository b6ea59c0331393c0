//! Core types and traits for the worker pool

pub mod error;
pub mod handler;
pub mod item;

pub use error::{PoolError, Result};
pub use handler::{Processor, ResultHandler};
pub use item::{ItemError, Outcome, WorkItem};

//! Bounded queues connecting the pool's stages.
//!
//! Both the item queue (allocator to workers) and the result channel
//! (workers to collector) are [`bounded`] crossbeam channels split into a
//! [`QueueSender`] and a [`QueueReceiver`]. Closing is explicit: the owning
//! stage calls [`QueueSender::close`] once it is done, and receivers observe
//! end-of-input after draining whatever was buffered.
//!
//! ```rust
//! use batch_worker_pool::queue::{bounded, QueueError};
//!
//! let (tx, rx) = bounded::<u32>(2);
//! tx.send(1).unwrap();
//! tx.send(2).unwrap();
//! assert!(matches!(tx.try_send(3), Err(QueueError::Full(3))));
//!
//! tx.close();
//! let drained: Vec<u32> = rx.iter().collect();
//! assert_eq!(drained, vec![1, 2]);
//! ```

mod bounded;

pub use bounded::{bounded, QueueReceiver, QueueSender};

/// Errors from sending on a queue
///
/// Both variants hand the rejected message back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError<M> {
    /// Queue is full (for try_send)
    Full(M),
    /// Every receiver is gone; the message was not delivered
    Closed(M),
}

impl<M> std::fmt::Display for QueueError<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueError::Full(_) => write!(f, "queue is full"),
            QueueError::Closed(_) => write!(f, "queue is closed"),
        }
    }
}

impl<M: std::fmt::Debug> std::error::Error for QueueError<M> {}

impl<M> QueueError<M> {
    /// Recover the message a failed send carried
    pub fn into_inner(self) -> M {
        match self {
            QueueError::Full(m) | QueueError::Closed(m) => m,
        }
    }
}

/// Errors from receiving on a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvError {
    /// Queue is empty (for try_recv)
    Empty,
    /// Queue is closed and fully drained
    Disconnected,
}

impl std::fmt::Display for RecvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecvError::Empty => write!(f, "queue is empty"),
            RecvError::Disconnected => write!(f, "queue is disconnected"),
        }
    }
}

impl std::error::Error for RecvError {}

/// Result type for send operations
pub type QueueResult<T, M> = std::result::Result<T, QueueError<M>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_display() {
        assert_eq!(QueueError::Full(1).to_string(), "queue is full");
        assert_eq!(QueueError::Closed(1).to_string(), "queue is closed");
        assert_eq!(RecvError::Empty.to_string(), "queue is empty");
        assert_eq!(RecvError::Disconnected.to_string(), "queue is disconnected");
    }

    #[test]
    fn test_queue_error_into_inner() {
        assert_eq!(QueueError::Full("item").into_inner(), "item");
        assert_eq!(QueueError::Closed("item").into_inner(), "item");
    }
}

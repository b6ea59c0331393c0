//! Bounded FIFO channel with explicit close.

use super::{QueueError, QueueResult, RecvError};
use crossbeam::channel::{self, Receiver, Sender, TryRecvError, TrySendError};

/// Creates a bounded queue holding at most `capacity` messages.
///
/// Senders block while the queue is full, which is what gives the pool its
/// backpressure. The receiving half may be cloned so several consumers can
/// pull from the same queue; each message goes to exactly one of them.
///
/// # Panics
///
/// Panics if `capacity` is 0.
pub fn bounded<M>(capacity: usize) -> (QueueSender<M>, QueueReceiver<M>) {
    assert!(capacity > 0, "capacity must be greater than 0");
    let (sender, receiver) = channel::bounded(capacity);
    (
        QueueSender { sender, capacity },
        QueueReceiver { receiver, capacity },
    )
}

/// Sending half of a bounded queue
///
/// The queue closes when the last sender is closed or dropped.
#[derive(Debug)]
pub struct QueueSender<M> {
    sender: Sender<M>,
    capacity: usize,
}

impl<M> Clone for QueueSender<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            capacity: self.capacity,
        }
    }
}

impl<M> QueueSender<M> {
    /// Send a message, blocking while the queue is full
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] with the message if every receiver is gone.
    pub fn send(&self, msg: M) -> QueueResult<(), M> {
        self.sender
            .send(msg)
            .map_err(|e| QueueError::Closed(e.into_inner()))
    }

    /// Send a message without blocking
    ///
    /// # Errors
    ///
    /// - [`QueueError::Full`] if the queue is at capacity
    /// - [`QueueError::Closed`] if every receiver is gone
    pub fn try_send(&self, msg: M) -> QueueResult<(), M> {
        self.sender.try_send(msg).map_err(|e| match e {
            TrySendError::Full(msg) => QueueError::Full(msg),
            TrySendError::Disconnected(msg) => QueueError::Closed(msg),
        })
    }

    /// Close this sender
    ///
    /// Once every clone is closed, receivers drain the buffered messages
    /// and then see the queue as disconnected.
    pub fn close(self) {
        drop(self);
    }

    /// Number of buffered messages
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    /// Maximum number of buffered messages
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Receiving half of a bounded queue
#[derive(Debug)]
pub struct QueueReceiver<M> {
    receiver: Receiver<M>,
    capacity: usize,
}

impl<M> Clone for QueueReceiver<M> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
            capacity: self.capacity,
        }
    }
}

impl<M> QueueReceiver<M> {
    /// Receive the next message, blocking while the queue is empty but open
    ///
    /// # Errors
    ///
    /// Returns [`RecvError::Disconnected`] once the queue is closed and drained.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv().map_err(|_| RecvError::Disconnected)
    }

    /// Receive without blocking
    ///
    /// # Errors
    ///
    /// - [`RecvError::Empty`] if nothing is buffered
    /// - [`RecvError::Disconnected`] if the queue is closed and drained
    pub fn try_recv(&self) -> Result<M, RecvError> {
        self.receiver.try_recv().map_err(|e| match e {
            TryRecvError::Empty => RecvError::Empty,
            TryRecvError::Disconnected => RecvError::Disconnected,
        })
    }

    /// Blocking iterator that ends when the queue is closed and drained
    pub fn iter(&self) -> channel::Iter<'_, M> {
        self.receiver.iter()
    }

    /// Number of buffered messages
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Maximum number of buffered messages
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

//! Work items and their outcomes

use std::fmt;

/// One unit of input work, tagged with its position in the input sequence
///
/// Created by the allocator and owned by exactly one stage at a time:
/// the item queue, then the worker that claims it, then the collector
/// (inside an [`Outcome`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem<T> {
    id: usize,
    payload: T,
}

impl<T> WorkItem<T> {
    /// Create a work item for the element at position `id`
    pub fn new(id: usize, payload: T) -> Self {
        Self { id, payload }
    }

    /// Zero-based index of this item in the input sequence
    pub fn id(&self) -> usize {
        self.id
    }

    /// Borrow the payload
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Take the payload out of the item
    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Why an item did not process cleanly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError<E> {
    /// The processor returned this error
    Failed(E),
    /// The processor panicked while handling the item
    Panicked {
        /// Worker that caught the panic
        worker_id: usize,
        /// Panic message, if it was a string
        message: String,
    },
}

impl<E> ItemError<E> {
    /// The processor's own error, if this is not a panic
    pub fn as_failure(&self) -> Option<&E> {
        match self {
            ItemError::Failed(e) => Some(e),
            ItemError::Panicked { .. } => None,
        }
    }

    /// Check whether the processor panicked
    pub fn is_panic(&self) -> bool {
        matches!(self, ItemError::Panicked { .. })
    }
}

impl<E: fmt::Display> fmt::Display for ItemError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemError::Failed(e) => write!(f, "{}", e),
            ItemError::Panicked { worker_id, message } => {
                write!(f, "processor panicked on worker #{}: {}", worker_id, message)
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for ItemError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ItemError::Failed(e) => Some(e),
            ItemError::Panicked { .. } => None,
        }
    }
}

/// The result of processing one [`WorkItem`]
///
/// Exactly one outcome is produced per item, by the worker that processed it,
/// and handed to the result handler on the collector thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T, E> {
    item: WorkItem<T>,
    error: Option<ItemError<E>>,
}

impl<T, E> Outcome<T, E> {
    /// Pair an item with the result of processing it
    pub fn new(item: WorkItem<T>, error: Option<ItemError<E>>) -> Self {
        Self { item, error }
    }

    /// Outcome for an item the processor accepted
    pub fn success(item: WorkItem<T>) -> Self {
        Self::new(item, None)
    }

    /// Outcome carrying the processor's error
    pub fn failure(item: WorkItem<T>, error: E) -> Self {
        Self::new(item, Some(ItemError::Failed(error)))
    }

    /// Id of the item this outcome belongs to
    pub fn id(&self) -> usize {
        self.item.id()
    }

    /// Borrow the item's payload
    pub fn payload(&self) -> &T {
        self.item.payload()
    }

    /// Borrow the processed item
    pub fn item(&self) -> &WorkItem<T> {
        &self.item
    }

    /// The error attached to this outcome, if any
    pub fn error(&self) -> Option<&ItemError<E>> {
        self.error.as_ref()
    }

    /// The exact error value returned by the processor, if it returned one
    pub fn processor_error(&self) -> Option<&E> {
        self.error.as_ref().and_then(ItemError::as_failure)
    }

    /// Check whether the item processed without error
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Split into the item and its error
    pub fn into_parts(self) -> (WorkItem<T>, Option<ItemError<E>>) {
        (self.item, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_accessors() {
        let item = WorkItem::new(3, "payload");
        assert_eq!(item.id(), 3);
        assert_eq!(*item.payload(), "payload");
        assert_eq!(item.into_payload(), "payload");
    }

    #[test]
    fn test_outcome_success() {
        let outcome: Outcome<&str, String> = Outcome::success(WorkItem::new(0, "a"));
        assert!(outcome.is_success());
        assert!(outcome.error().is_none());
        assert!(outcome.processor_error().is_none());
        assert_eq!(outcome.id(), 0);
    }

    #[test]
    fn test_outcome_failure_keeps_error() {
        let outcome = Outcome::failure(WorkItem::new(1, "y"), "bad input".to_string());
        assert!(!outcome.is_success());
        assert_eq!(outcome.processor_error().map(String::as_str), Some("bad input"));
        assert_eq!(*outcome.payload(), "y");

        let (item, error) = outcome.into_parts();
        assert_eq!(item.id(), 1);
        assert_eq!(error, Some(ItemError::Failed("bad input".to_string())));
    }

    #[test]
    fn test_panicked_error() {
        let err: ItemError<String> = ItemError::Panicked {
            worker_id: 2,
            message: "boom".to_string(),
        };
        assert!(err.is_panic());
        assert!(err.as_failure().is_none());
        assert_eq!(err.to_string(), "processor panicked on worker #2: boom");
    }
}

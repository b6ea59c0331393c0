//! Allocator: feeds the input sequence into the item queue

use crate::core::WorkItem;
use crate::queue::QueueSender;
use log::{debug, warn};

/// Push every input element onto the item queue, tagged with its position,
/// then close the queue.
///
/// Blocks whenever the queue is full. Returns the number of items sent.
/// Sending only stops early if every worker has gone away, which leaves
/// nothing to process the rest of the input.
pub(crate) fn allocate<I, T>(items: I, queue: QueueSender<WorkItem<T>>) -> u64
where
    I: Iterator<Item = T>,
{
    let (lower, _) = items.size_hint();
    debug!("allocating resources (at least {})", lower);

    let mut sent = 0u64;
    for (id, payload) in items.enumerate() {
        if let Err(e) = queue.send(WorkItem::new(id, payload)) {
            let item = e.into_inner();
            warn!(
                "item queue has no consumers left; stopped allocating at item {}",
                item.id()
            );
            break;
        }
        sent += 1;

        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_allocation(queue.len());
    }

    queue.close();
    debug!("done allocating {} items", sent);
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::bounded;
    use std::thread;

    #[test]
    fn test_assigns_positional_ids_and_closes() {
        let (tx, rx) = bounded(2);
        let producer = thread::spawn(move || allocate(vec!["a", "b", "c"].into_iter(), tx));

        let received: Vec<_> = rx.iter().map(|item| (item.id(), *item.payload())).collect();
        assert_eq!(producer.join().unwrap(), 3);
        assert_eq!(received, vec![(0, "a"), (1, "b"), (2, "c")]);
    }

    #[test]
    fn test_empty_input_closes_immediately() {
        let (tx, rx) = bounded::<WorkItem<u8>>(1);
        assert_eq!(allocate(std::iter::empty(), tx), 0);
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_stops_when_consumers_are_gone() {
        let (tx, rx) = bounded(1);
        drop(rx);
        assert_eq!(allocate(0..10, tx), 0);
    }
}

//! Collector: hands every outcome to the result handler

use crate::core::{Outcome, ResultHandler};
use crate::pool::completion::Completion;
use crate::pool::worker::panic_message;
use crate::queue::QueueReceiver;
use log::{debug, error, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Counters gathered while draining the result channel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CollectorReport {
    pub outcomes_handled: u64,
    pub items_failed: u64,
    pub items_panicked: u64,
    pub handler_errors: u64,
    pub handler_panics: u64,
}

/// Fires the completion signal when dropped, so `start` is released even if
/// the collector thread unwinds.
struct FireOnDrop<'a>(&'a Completion);

impl Drop for FireOnDrop<'_> {
    fn drop(&mut self) {
        self.0.complete();
    }
}

/// Drain the result channel into `handler`, then fire `completion`.
///
/// Outcomes are handled one at a time in arrival order. Handler errors are
/// logged and counted only; a handler panic is caught so the remaining
/// outcomes still get handled and the completion signal still fires.
pub(crate) fn collect<T, E, H>(
    results: QueueReceiver<Outcome<T, E>>,
    mut handler: H,
    completion: &Completion,
) -> CollectorReport
where
    H: ResultHandler<T, E>,
{
    let _fire = FireOnDrop(completion);
    debug!("collector starting");
    let mut report = CollectorReport::default();

    for outcome in results.iter() {
        let id = outcome.id();
        match outcome.error() {
            Some(err) if err.is_panic() => report.items_panicked += 1,
            Some(_) => report.items_failed += 1,
            None => {}
        }

        // The error's Display is caller code, so it is rendered under the guard
        let handled = catch_unwind(AssertUnwindSafe(|| {
            handler.handle(outcome).map_err(|e| e.to_string())
        }));
        match handled {
            Ok(Ok(())) => debug!("item {} completed, outcome: ok", id),
            Ok(Err(e)) => {
                warn!("item {} completed, result handler failed: {}", id, e);
                report.handler_errors += 1;
            }
            Err(panic_info) => {
                error!(
                    "item {}: result handler panicked: {}",
                    id,
                    panic_message(panic_info.as_ref())
                );
                report.handler_panics += 1;
            }
        }
        report.outcomes_handled += 1;
    }

    debug!(
        "collector done after {} outcomes, signalling completion",
        report.outcomes_handled
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ItemError, WorkItem};
    use crate::queue::bounded;

    #[test]
    fn test_collects_all_and_fires_completion() {
        let (tx, rx) = bounded(4);
        tx.send(Outcome::success(WorkItem::new(0, "a"))).unwrap();
        tx.send(Outcome::failure(WorkItem::new(1, "b"), "nope")).unwrap();
        tx.send(Outcome::new(
            WorkItem::new(2, "c"),
            Some(ItemError::Panicked {
                worker_id: 0,
                message: "boom".to_string(),
            }),
        ))
        .unwrap();
        tx.close();

        let completion = Completion::new();
        let mut seen = Vec::new();
        let report = collect(
            rx,
            |outcome: Outcome<&str, &str>| -> Result<(), String> {
                seen.push(outcome.id());
                Ok(())
            },
            &completion,
        );

        assert!(completion.is_completed());
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(report.outcomes_handled, 3);
        assert_eq!(report.items_failed, 1);
        assert_eq!(report.items_panicked, 1);
        assert_eq!(report.handler_errors, 0);
    }

    #[test]
    fn test_handler_errors_do_not_stop_collection() {
        let (tx, rx) = bounded(4);
        for id in 0..4 {
            tx.send(Outcome::<usize, ()>::success(WorkItem::new(id, id)))
                .unwrap();
        }
        tx.close();

        let completion = Completion::new();
        let report = collect(
            rx,
            |outcome: Outcome<usize, ()>| {
                if outcome.id() == 1 {
                    panic!("handler bug");
                }
                if outcome.id() % 2 == 0 {
                    Err("even ids are rejected")
                } else {
                    Ok(())
                }
            },
            &completion,
        );

        assert!(completion.is_completed());
        assert_eq!(report.outcomes_handled, 4);
        assert_eq!(report.handler_errors, 2);
        assert_eq!(report.handler_panics, 1);
    }

    #[test]
    fn test_empty_channel_still_completes() {
        let (tx, rx) = bounded::<Outcome<u8, ()>>(1);
        tx.close();

        let completion = Completion::new();
        let report = collect(rx, |_: Outcome<u8, ()>| Ok::<(), String>(()), &completion);

        assert!(completion.is_completed());
        assert_eq!(report, CollectorReport::default());
    }

    struct Garbled;

    impl std::fmt::Display for Garbled {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            panic!("Display of handler error panicked")
        }
    }

    #[test]
    fn test_handler_error_with_panicking_display() {
        let (tx, rx) = bounded(4);
        for id in 0..3 {
            tx.send(Outcome::<usize, ()>::success(WorkItem::new(id, id)))
                .unwrap();
        }
        tx.close();

        let completion = Completion::new();
        let report = collect(rx, |_: Outcome<usize, ()>| Err::<(), _>(Garbled), &completion);

        assert!(completion.is_completed());
        assert_eq!(report.outcomes_handled, 3);
        assert_eq!(report.handler_errors, 0);
        assert_eq!(report.handler_panics, 3);
    }

    #[test]
    fn test_completion_fires_when_collector_unwinds() {
        let completion = Completion::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _fire = FireOnDrop(&completion);
            panic!("collector thread died");
        }));

        assert!(result.is_err());
        assert!(completion.is_completed());
    }
}

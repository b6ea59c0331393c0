//! A result handler whose error cannot even be displayed must not hang the run

use batch_worker_pool::prelude::*;
use log::LevelFilter;
use std::fmt;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

struct Unprintable;

impl fmt::Display for Unprintable {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("handler error cannot be displayed")
    }
}

#[test]
fn test_start_returns_when_handler_error_display_panics() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Warn)
        .try_init();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let pool = WorkerPool::new(2).expect("Failed to create pool");
        let result = pool.start(
            0..4u32,
            |_: &u32| Ok::<(), String>(()),
            |_: Outcome<u32, String>| Err::<(), _>(Unprintable),
        );
        let _ = tx.send((result, pool.is_completed()));
    });

    let (result, completed) = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("start() still blocked after 5s");
    let summary = result.expect("Run failed");

    assert!(completed);
    assert_eq!(summary.outcomes_handled, 4);
    assert_eq!(summary.handler_panics, 4);
    assert_eq!(summary.handler_errors, 0);
}

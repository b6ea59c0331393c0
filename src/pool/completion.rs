//! One-shot completion signal

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;

/// A one-time event fired when every outcome of a run has been handled
///
/// Cloning gives another handle to the same event, so other threads can
/// wait on a run they did not start.
///
/// # Example
///
/// ```rust
/// use batch_worker_pool::pool::Completion;
///
/// let completion = Completion::new();
/// assert!(!completion.is_completed());
///
/// let signal = completion.clone();
/// std::thread::spawn(move || {
///     signal.complete();
/// });
///
/// completion.wait();
/// assert!(completion.is_completed());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Completion {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    done: Mutex<bool>,
    cond: Condvar,
}

impl Completion {
    /// Create an unfired completion signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal and wake every waiter
    ///
    /// Returns `false` if the signal had already fired; only the first call
    /// has any effect.
    pub fn complete(&self) -> bool {
        let mut done = self.inner.done.lock();
        if *done {
            return false;
        }
        *done = true;
        self.inner.cond.notify_all();
        true
    }

    /// Check whether the signal has fired
    pub fn is_completed(&self) -> bool {
        *self.inner.done.lock()
    }

    /// Block until the signal fires
    pub fn wait(&self) {
        let mut done = self.inner.done.lock();
        while !*done {
            self.inner.cond.wait(&mut done);
        }
    }

    /// Block until the signal fires or the timeout elapses
    ///
    /// Returns `true` if the signal fired.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut done = self.inner.done.lock();
        if !*done {
            // Spurious wakeups are handled by the predicate
            self.inner
                .cond
                .wait_while_for(&mut done, |done| !*done, timeout);
        }
        *done
    }
}

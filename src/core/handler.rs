//! Caller-supplied callbacks

use crate::core::item::Outcome;
use std::fmt;

/// Business logic applied to every payload
///
/// The same processor is shared by all workers and invoked concurrently with
/// itself, hence the `Sync` bound. The pool adds no synchronization around it.
///
/// Any `Fn(&T) -> Result<(), E> + Sync` closure is a processor.
pub trait Processor<T, E>: Sync {
    /// Process one payload
    ///
    /// # Errors
    ///
    /// The returned error is attached to the item's [`Outcome`]; it never
    /// stops the run.
    fn process(&self, payload: &T) -> Result<(), E>;
}

impl<T, E, F> Processor<T, E> for F
where
    F: Fn(&T) -> Result<(), E> + Sync,
{
    fn process(&self, payload: &T) -> Result<(), E> {
        self(payload)
    }
}

/// Consumer of every [`Outcome`] produced by a run
///
/// Called only from the collector thread, one outcome at a time and never
/// concurrently with itself, so it may hold mutable state.
///
/// Any `FnMut(Outcome<T, E>) -> Result<(), X> + Send` closure where `X: Display`
/// is a result handler.
pub trait ResultHandler<T, E>: Send {
    /// Error reported by the handler; logged, never escalated
    type Error: fmt::Display;

    /// Handle one outcome
    ///
    /// # Errors
    ///
    /// The pool only logs and counts handler errors. Deciding what a failed
    /// outcome means is up to the handler itself.
    fn handle(&mut self, outcome: Outcome<T, E>) -> Result<(), Self::Error>;
}

impl<T, E, X, F> ResultHandler<T, E> for F
where
    F: FnMut(Outcome<T, E>) -> Result<(), X> + Send,
    X: fmt::Display,
{
    type Error = X;

    fn handle(&mut self, outcome: Outcome<T, E>) -> Result<(), X> {
        self(outcome)
    }
}

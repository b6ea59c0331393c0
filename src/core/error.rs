//! Error types for the worker pool

use uuid::Uuid;

/// Result type for worker pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that can occur while configuring or running a worker pool
///
/// Failures of individual items are not reported here; they travel inside
/// each [`Outcome`](crate::core::Outcome) to the result handler.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// The pool has already run its batch
    #[error("Worker pool run {run_id} was already started; a pool runs exactly one batch")]
    AlreadyStarted {
        /// Identifier of the run that consumed the pool
        run_id: Uuid,
    },

    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// Failed to spawn one of the pool threads
    #[error("Failed to spawn thread '{thread_name}': {message}")]
    SpawnError {
        /// Name of the thread that failed to spawn
        thread_name: String,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// General error
    #[error("{0}")]
    Other(String),
}

impl PoolError {
    /// Create an already started error
    pub fn already_started(run_id: Uuid) -> Self {
        PoolError::AlreadyStarted { run_id }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a spawn error
    pub fn spawn(thread_name: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::SpawnError {
            thread_name: thread_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a spawn error with source
    pub fn spawn_with_source(thread_name: impl Into<String>, source: std::io::Error) -> Self {
        PoolError::SpawnError {
            thread_name: thread_name.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PoolError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_creation() {
        let err = PoolError::already_started(Uuid::nil());
        assert!(matches!(err, PoolError::AlreadyStarted { .. }));

        let err = PoolError::invalid_config("num_workers", "must be greater than 0");
        assert!(matches!(err, PoolError::InvalidConfig { .. }));

        let err = PoolError::spawn("pool-3", "out of threads");
        assert!(matches!(err, PoolError::SpawnError { source: None, .. }));
    }

    #[test]
    fn test_error_display() {
        let err = PoolError::invalid_config("num_workers", "must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'num_workers': must be greater than 0"
        );

        let err = PoolError::already_started(Uuid::nil());
        assert_eq!(
            err.to_string(),
            "Worker pool run 00000000-0000-0000-0000-000000000000 was already started; \
             a pool runs exactly one batch"
        );
    }

    #[test]
    fn test_spawn_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WouldBlock, "resource busy");
        let err = PoolError::spawn_with_source("pool-collector", io_err);

        assert!(err.to_string().contains("pool-collector"));
        assert!(err.to_string().contains("resource busy"));
        assert!(err.source().is_some());
    }
}

//! Wrapper error types.

use thiserror::Error;

/// Opaque failure raised by the native connection capability.
///
/// The concrete driver error type belongs to the driver layer; this crate
/// only carries it through as the cause of a [`ConnectionError::Native`].
pub type NativeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a pooled connection handle.
///
/// Exactly two situations produce an error at this layer: an operation was
/// attempted on a handle whose closed flag is set, or the native handle
/// failed while performing a delegated operation. There are no
/// operation-specific kinds and no retry logic; every failure goes straight
/// to the immediate caller.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The wrapper considers the connection closed; the native handle was
    /// not touched.
    #[error("connection is closed")]
    Closed,

    /// The native handle raised a failure during a delegated operation.
    /// The original failure is preserved as the error source.
    #[error("native connection failure: {0}")]
    Native(#[source] NativeError),
}

impl ConnectionError {
    /// Check whether this is the closed-handle error.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// The underlying driver failure, if this error wraps one.
    #[must_use]
    pub fn native_cause(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        match self {
            Self::Native(cause) => Some(cause.as_ref()),
            Self::Closed => None,
        }
    }
}

/// Result type for pooled connection operations.
pub type Result<T> = std::result::Result<T, ConnectionError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_display() {
        assert_eq!(ConnectionError::Closed.to_string(), "connection is closed");
        assert!(ConnectionError::Closed.is_closed());
        assert!(ConnectionError::Closed.native_cause().is_none());
    }

    #[test]
    fn test_native_preserves_cause() {
        let cause: NativeError = "socket reset".into();
        let err = ConnectionError::Native(cause);

        assert!(!err.is_closed());
        assert_eq!(err.to_string(), "native connection failure: socket reset");
        assert_eq!(err.native_cause().unwrap().to_string(), "socket reset");
    }
}

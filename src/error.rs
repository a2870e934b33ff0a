//! Error types for factlog.
//!
//! All errors are strongly typed using thiserror. The enum is `Clone` and
//! `PartialEq` (context is carried as strings) so that a terminal stream
//! error can be reported by `err()` without consuming the stream.

use thiserror::Error;

/// Top-level error type for factlog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An identity was constructed with an empty name.
    #[error("invalid identity: {reason}")]
    InvalidIdentity {
        /// Why the identity is malformed.
        reason: String,
    },

    /// A storage engine call failed.
    #[error("storage error: {0}")]
    Io(String),

    /// A stored payload could not be decoded for its key class.
    #[error("decode error for {key}: {reason}")]
    Decode {
        /// Storage key whose payload was malformed.
        key: String,
        /// Decoder failure detail.
        reason: String,
    },

    /// A named log head is absent from its domain partition.
    #[error("log {domain}/{name} does not exist")]
    DoesNotExist {
        /// Domain partition that was searched.
        domain: String,
        /// Log name within the partition.
        name: String,
    },

    /// An internal invariant was violated, e.g. a segment chain cycle.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl Error {
    /// Creates an `InvalidIdentity` error.
    #[must_use]
    pub fn invalid_identity(reason: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            reason: reason.into(),
        }
    }

    /// Creates an `Io` error from any displayable cause.
    #[must_use]
    pub fn io(cause: impl std::fmt::Display) -> Self {
        Self::Io(cause.to_string())
    }

    /// Creates a `Decode` error for the given storage key.
    #[must_use]
    pub fn decode(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error marks an absent log.
    #[must_use]
    pub const fn is_does_not_exist(&self) -> bool {
        matches!(self, Self::DoesNotExist { .. })
    }

    /// Returns true if this is a storage I/O failure.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Result type alias for factlog operations.
pub type Result<T> = std::result::Result<T, Error>;

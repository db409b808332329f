//! Unified error system for the delegation ledger
//!
//! Every ledger operation reports failure through a single `LedgerError`.
//! Each variant carries a human readable message; numeric context is kept
//! in dedicated fields where callers are expected to inspect it.

use serde::{Deserialize, Serialize};

/// Unified error type for all ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LedgerError {
    /// Unknown record identifier
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Malformed numeric input or a record of the wrong type
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message describing the invalid input
        message: String,
    },

    /// Sub-delegation or delegation recipient is not acceptable
    #[error("Invalid recipient: {message}")]
    InvalidRecipient {
        /// Error message describing why the recipient was rejected
        message: String,
    },

    /// Root delegation grandor is not a registered service
    #[error("Invalid grandor: {message}")]
    InvalidGrandor {
        /// Error message describing why the grandor was rejected
        message: String,
    },

    /// Recipient equals the delegating party
    #[error("Self delegation: {message}")]
    SelfDelegation {
        /// Error message naming the offending party
        message: String,
    },

    /// Requested sub-delegation budget exceeds the parent's headroom
    #[error("Capacity exceeded: requested {requested}, parent holds {available}")]
    CapacityExceeded {
        /// Budget requested for the child
        requested: u64,
        /// Remaining budget of the parent at request time
        available: u64,
    },

    /// Validity window does not nest inside the parent's window
    #[error("Window violation: {message}")]
    WindowViolation {
        /// Error message describing the window conflict
        message: String,
    },

    /// Grant would already be expired at the transaction time
    #[error("Already expired: {message}")]
    AlreadyExpired {
        /// Error message describing the expiry conflict
        message: String,
    },

    /// An ancestor in the chain is suspended or revoked
    #[error("Ancestor inactive: {message}")]
    AncestorInactive {
        /// Error message naming the inactive ancestor
        message: String,
    },

    /// Revoker is not listed on the record
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message naming the rejected revoker
        message: String,
    },

    /// Register call on a key that already holds a record
    #[error("Already exists: {message}")]
    AlreadyExists {
        /// Error message naming the occupied key
        message: String,
    },

    /// Record store or transaction context failed
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Error message describing the store failure
        message: String,
    },

    /// Stored bytes could not be decoded or encoded
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Ledger invariant breached
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

/// Fieldless discriminant of [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// [`LedgerError::NotFound`]
    NotFound,
    /// [`LedgerError::InvalidArgument`]
    InvalidArgument,
    /// [`LedgerError::InvalidRecipient`]
    InvalidRecipient,
    /// [`LedgerError::InvalidGrandor`]
    InvalidGrandor,
    /// [`LedgerError::SelfDelegation`]
    SelfDelegation,
    /// [`LedgerError::CapacityExceeded`]
    CapacityExceeded,
    /// [`LedgerError::WindowViolation`]
    WindowViolation,
    /// [`LedgerError::AlreadyExpired`]
    AlreadyExpired,
    /// [`LedgerError::AncestorInactive`]
    AncestorInactive,
    /// [`LedgerError::Unauthorized`]
    Unauthorized,
    /// [`LedgerError::AlreadyExists`]
    AlreadyExists,
    /// [`LedgerError::StoreUnavailable`]
    StoreUnavailable,
    /// [`LedgerError::Serialization`]
    Serialization,
    /// [`LedgerError::Internal`]
    Internal,
}

impl LedgerError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid recipient error
    pub fn invalid_recipient(message: impl Into<String>) -> Self {
        Self::InvalidRecipient {
            message: message.into(),
        }
    }

    /// Create an invalid grandor error
    pub fn invalid_grandor(message: impl Into<String>) -> Self {
        Self::InvalidGrandor {
            message: message.into(),
        }
    }

    /// Create a self delegation error
    pub fn self_delegation(message: impl Into<String>) -> Self {
        Self::SelfDelegation {
            message: message.into(),
        }
    }

    /// Create a capacity exceeded error
    pub fn capacity_exceeded(requested: u64, available: u64) -> Self {
        Self::CapacityExceeded {
            requested,
            available,
        }
    }

    /// Create a window violation error
    pub fn window_violation(message: impl Into<String>) -> Self {
        Self::WindowViolation {
            message: message.into(),
        }
    }

    /// Create an already expired error
    pub fn already_expired(message: impl Into<String>) -> Self {
        Self::AlreadyExpired {
            message: message.into(),
        }
    }

    /// Create an ancestor inactive error
    pub fn ancestor_inactive(message: impl Into<String>) -> Self {
        Self::AncestorInactive {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create an already exists error
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    /// Create a store unavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Discriminant of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::InvalidRecipient { .. } => ErrorKind::InvalidRecipient,
            Self::InvalidGrandor { .. } => ErrorKind::InvalidGrandor,
            Self::SelfDelegation { .. } => ErrorKind::SelfDelegation,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::WindowViolation { .. } => ErrorKind::WindowViolation,
            Self::AlreadyExpired { .. } => ErrorKind::AlreadyExpired,
            Self::AncestorInactive { .. } => ErrorKind::AncestorInactive,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            Self::Serialization { .. } => ErrorKind::Serialization,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}

/// Standard Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::store_unavailable(err.to_string())
    }
}

//! Error types for ChainGate

use crate::address::Address;
use crate::transaction::TransactionType;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    DecodingError(String),
    EncodingError(String),
    CryptoError(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            ChainError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            ChainError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            ChainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ChainError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::DecodingError(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

/// Coarse rejection categories callers can alert on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Unauthenticated,
    Replayed,
    UnknownOperation,
    MalformedArguments,
}

/// Reason a transaction was not admitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    /// The sender has no registered verification key.
    #[error("sender {0} is not a registered client")]
    UnknownSender(Address),

    #[error("transaction is not signed")]
    Unsigned,

    /// The signature was already seen by the ledger.
    #[error("signature was already submitted")]
    Replayed,

    /// The signature does not verify, or the key manager could not check it.
    #[error("signature verification failed: {0}")]
    Unauthenticated(String),

    /// Function signature does not resolve to a known operation.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("malformed arguments for {tx_type}: {reason}")]
    MalformedArguments {
        tx_type: TransactionType,
        reason: String,
    },
}

impl ValidationFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            ValidationFailure::UnknownSender(_)
            | ValidationFailure::Unsigned
            | ValidationFailure::Unauthenticated(_) => FailureKind::Unauthenticated,
            ValidationFailure::Replayed => FailureKind::Replayed,
            ValidationFailure::UnknownOperation(_) => FailureKind::UnknownOperation,
            ValidationFailure::MalformedArguments { .. } => FailureKind::MalformedArguments,
        }
    }
}

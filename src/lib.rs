//! ChainGate - admission checks and canonical encoding for ledger transactions
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Value Types
//! - [`address`] - 20-byte account addresses
//! - [`amount`] - Native (wei) and token amounts
//!
//! ## Transactions
//! - [`transaction`] - Transaction entity, operation catalog, validation engine and wire codec
//!
//! ## Collaborators
//! - [`crypto`] - Signatures and verification (secp256k1), the `KeyManager` seam
//! - [`blockchain`] - Ledger context: client registry, replay set, function table
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`logging`] - Tracing subscriber setup

#![forbid(unsafe_code)]

// ============================================================================
// Value Types
// ============================================================================
pub mod address;
pub mod amount;

// ============================================================================
// Transactions
// ============================================================================
pub mod transaction;

// ============================================================================
// Collaborators
// ============================================================================
pub mod blockchain;
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
pub mod logging;

pub use address::Address;
pub use amount::{NativeAmount, TokenAmount};
pub use blockchain::{Blockchain, LedgerContext, NodeRegistry};
pub use crypto::{KeyManager, KeyPair, Secp256k1KeyManager, VerificationKey};
pub use error::{ChainError, FailureKind, ValidationFailure};
pub use transaction::{Operation, SigningScheme, Transaction, TransactionType, Validator};

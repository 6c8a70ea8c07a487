// Thin re-export module: the ledger context the validation engine queries
// lives in `blockchain/ledger.rs`, the client registry in
// `blockchain/registry.rs`.

pub mod ledger;
pub mod registry;

pub use ledger::*;
pub use registry::*;

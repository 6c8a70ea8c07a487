//! Transaction module split into types, validation and wire codec

pub mod codec;
pub mod types;
pub mod validation;

pub use codec::WireTransaction;
pub use types::*;
pub use validation::{check_arguments, Validator};

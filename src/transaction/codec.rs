//! Wire representation of transactions.
//!
//! Each field has its own encode/decode pair; [`WireTransaction`] is assembled
//! from them and never mirrors the in-memory layout directly.

use crate::address::Address;
use crate::amount::{NativeAmount, TokenAmount};
use crate::error::ChainError;
use crate::transaction::types::{Amount, Operation, Transaction, TransactionType};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// External record exchanged between parties. Absent optional fields are
/// omitted from the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTransaction {
    pub transaction_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_operation: Option<String>,
    pub sender_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wei_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

pub fn encode_address(address: &Address) -> String {
    address.to_hex()
}

pub fn decode_address(field: &str, value: &str) -> Result<Address, ChainError> {
    Address::from_hex(value).map_err(|e| field_error(field, e))
}

pub fn decode_optional_address(
    field: &str,
    value: Option<&str>,
) -> Result<Option<Address>, ChainError> {
    value.map(|v| decode_address(field, v)).transpose()
}

pub fn encode_token_amount(amount: TokenAmount) -> Result<f64, ChainError> {
    if amount.is_finite() {
        Ok(amount.value())
    } else {
        Err(ChainError::EncodingError(format!(
            "amount: {} cannot be represented in JSON",
            amount.value()
        )))
    }
}

pub fn encode_native_amount(amount: &NativeAmount) -> String {
    amount.to_display_string()
}

pub fn decode_native_amount(value: &str) -> Result<NativeAmount, ChainError> {
    NativeAmount::from_display_str(value).map_err(|e| field_error("weiAmount", e))
}

pub fn encode_signature(signature: &[u8]) -> String {
    STANDARD.encode(signature)
}

pub fn decode_signature(value: &str) -> Result<Vec<u8>, ChainError> {
    STANDARD
        .decode(value)
        .map_err(|e| ChainError::DecodingError(format!("signature: invalid Base64: {}", e)))
}

pub fn decode_operation(
    function_signature: Option<String>,
    native_operation: Option<&str>,
) -> Result<Operation, ChainError> {
    match (function_signature, native_operation) {
        (Some(signature), None) => Ok(Operation::ContractCall(signature)),
        (None, Some(name)) => name
            .parse::<TransactionType>()
            .map(Operation::Native)
            .map_err(|e| field_error("nativeOperation", e)),
        (Some(_), Some(_)) => Err(ChainError::DecodingError(
            "functionSignature and nativeOperation are mutually exclusive".to_string(),
        )),
        (None, None) => Err(ChainError::DecodingError(
            "one of functionSignature or nativeOperation is required".to_string(),
        )),
    }
}

pub fn decode_amount(
    amount: Option<f64>,
    wei_amount: Option<&str>,
) -> Result<Option<Amount>, ChainError> {
    match (amount, wei_amount) {
        (None, None) => Ok(None),
        (Some(token), None) => Ok(Some(Amount::Token(TokenAmount::new(token)))),
        (None, Some(wei)) => Ok(Some(Amount::Native(decode_native_amount(wei)?))),
        (Some(_), Some(_)) => Err(ChainError::DecodingError(
            "amount and weiAmount are mutually exclusive".to_string(),
        )),
    }
}

fn field_error(field: &str, err: ChainError) -> ChainError {
    match err {
        ChainError::DecodingError(msg) => ChainError::DecodingError(format!("{}: {}", field, msg)),
        other => other,
    }
}

impl TryFrom<&Transaction> for WireTransaction {
    type Error = ChainError;

    fn try_from(tx: &Transaction) -> Result<Self, Self::Error> {
        let (function_signature, native_operation) = match &tx.operation {
            Operation::ContractCall(signature) => (Some(signature.clone()), None),
            Operation::Native(tx_type) => (None, Some(tx_type.name().to_string())),
        };
        Ok(WireTransaction {
            transaction_id: tx.id,
            function_signature,
            native_operation,
            sender_address: encode_address(&tx.sender),
            receiver_address: tx.receiver.as_ref().map(encode_address),
            owner_address: tx.owner.as_ref().map(encode_address),
            amount: tx.token_amount().map(encode_token_amount).transpose()?,
            wei_amount: tx.native_amount().map(encode_native_amount),
            signature: tx.signature.as_deref().map(encode_signature),
        })
    }
}

impl TryFrom<WireTransaction> for Transaction {
    type Error = ChainError;

    fn try_from(wire: WireTransaction) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: wire.transaction_id,
            sender: decode_address("senderAddress", &wire.sender_address)?,
            operation: decode_operation(
                wire.function_signature,
                wire.native_operation.as_deref(),
            )?,
            owner: decode_optional_address("ownerAddress", wire.owner_address.as_deref())?,
            receiver: decode_optional_address(
                "receiverAddress",
                wire.receiver_address.as_deref(),
            )?,
            amount: decode_amount(wire.amount, wire.wei_amount.as_deref())?,
            signature: wire.signature.as_deref().map(decode_signature).transpose()?,
        })
    }
}

impl Transaction {
    pub fn to_wire(&self) -> Result<WireTransaction, ChainError> {
        WireTransaction::try_from(self)
    }

    pub fn to_json(&self) -> Result<String, ChainError> {
        serde_json::to_string(&self.to_wire()?).map_err(|e| {
            ChainError::EncodingError(format!("Failed to convert transaction to JSON: {}", e))
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ChainError> {
        let wire: WireTransaction = serde_json::from_str(json)?;
        Transaction::try_from(wire)
    }
}

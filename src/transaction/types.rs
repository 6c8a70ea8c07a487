/// Transaction types for ChainGate
use crate::address::Address;
use crate::amount::{NativeAmount, TokenAmount};
use crate::crypto::KeyPair;
use crate::error::ChainError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::str::FromStr;

/// Operations a transaction can invoke, either natively or through the
/// token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    AddToBlacklist,
    IsBlacklisted,
    RemoveFromBlacklist,
    BalanceOf,
    NativeBalance,
    Approve,
    Transfer,
    NativeTransfer,
    Allowance,
    TransferFrom,
    TotalSupply,
}

impl TransactionType {
    pub const ALL: [TransactionType; 11] = [
        TransactionType::AddToBlacklist,
        TransactionType::IsBlacklisted,
        TransactionType::RemoveFromBlacklist,
        TransactionType::BalanceOf,
        TransactionType::NativeBalance,
        TransactionType::Approve,
        TransactionType::Transfer,
        TransactionType::NativeTransfer,
        TransactionType::Allowance,
        TransactionType::TransferFrom,
        TransactionType::TotalSupply,
    ];

    /// Canonical name, as used on the wire and in signing payloads.
    pub fn name(self) -> &'static str {
        match self {
            TransactionType::AddToBlacklist => "ADD_TO_BLACKLIST",
            TransactionType::IsBlacklisted => "IS_BLACKLISTED",
            TransactionType::RemoveFromBlacklist => "REMOVE_FROM_BLACKLIST",
            TransactionType::BalanceOf => "BALANCE_OF",
            TransactionType::NativeBalance => "NATIVE_BALANCE",
            TransactionType::Approve => "APPROVE",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::NativeTransfer => "NATIVE_TRANSFER",
            TransactionType::Allowance => "ALLOWANCE",
            TransactionType::TransferFrom => "TRANSFER_FROM",
            TransactionType::TotalSupply => "TOTAL_SUPPLY",
        }
    }

    /// Solidity signature of the token contract function implementing this
    /// operation. Native operations have none.
    pub fn contract_signature(self) -> Option<&'static str> {
        match self {
            TransactionType::AddToBlacklist => Some("addToBlacklist(address)"),
            TransactionType::IsBlacklisted => Some("isBlacklisted(address)"),
            TransactionType::RemoveFromBlacklist => Some("removeFromBlacklist(address)"),
            TransactionType::BalanceOf => Some("balanceOf(address)"),
            TransactionType::Approve => Some("approve(address,uint256)"),
            TransactionType::Transfer => Some("transfer(address,uint256)"),
            TransactionType::Allowance => Some("allowance(address,address)"),
            TransactionType::TransferFrom => Some("transferFrom(address,address,uint256)"),
            TransactionType::TotalSupply => Some("totalSupply()"),
            TransactionType::NativeBalance | TransactionType::NativeTransfer => None,
        }
    }

    /// Arguments a transaction of this type must carry.
    pub fn shape(self) -> ArgumentShape {
        use AddressArity::*;
        use AmountRequirement::*;

        let (addresses, amount) = match self {
            TransactionType::AddToBlacklist
            | TransactionType::IsBlacklisted
            | TransactionType::RemoveFromBlacklist
            | TransactionType::BalanceOf
            | TransactionType::NativeBalance => (Receiver, Absent),
            TransactionType::Approve | TransactionType::Transfer => (Receiver, Token),
            TransactionType::NativeTransfer => (Receiver, Native),
            TransactionType::Allowance => (OwnerAndReceiver, Absent),
            TransactionType::TransferFrom => (OwnerAndReceiver, Token),
            TransactionType::TotalSupply => (NoAddress, Absent),
        };
        ArgumentShape { addresses, amount }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransactionType {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ChainError::DecodingError(format!("Unknown transaction type '{}'", s)))
    }
}

/// Addresses required besides the sender's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressArity {
    NoAddress,
    Receiver,
    OwnerAndReceiver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRequirement {
    /// No amount of either kind may be present.
    Absent,
    Token,
    Native,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentShape {
    pub addresses: AddressArity,
    pub amount: AmountRequirement,
}

/// What a transaction asks the ledger to do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Call of a token contract function, by signature.
    ContractCall(String),
    /// Operation on the base currency, outside any contract.
    Native(TransactionType),
}

impl Operation {
    /// Text identifying the operation in the signing payload.
    pub fn selector(&self) -> &str {
        match self {
            Operation::ContractCall(signature) => signature,
            Operation::Native(tx_type) => tx_type.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Token(TokenAmount),
    Native(NativeAmount),
}

impl Amount {
    pub fn token(&self) -> Option<TokenAmount> {
        match self {
            Amount::Token(amount) => Some(*amount),
            Amount::Native(_) => None,
        }
    }

    pub fn native(&self) -> Option<&NativeAmount> {
        match self {
            Amount::Native(amount) => Some(amount),
            Amount::Token(_) => None,
        }
    }
}

/// Fields that go into the bytes a sender signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SigningScheme {
    /// id, selector, owner, receiver and token amount. Native amounts are not
    /// covered, so a relay can alter the value of a native transfer without
    /// breaking its signature.
    #[default]
    Legacy,
    /// Legacy fields followed by the native amount in wei.
    IncludeNativeAmount,
}

/// A single unit of ledger work submitted by a registered client.
#[derive(Clone)]
pub struct Transaction {
    pub id: u64,
    pub sender: Address,
    pub operation: Operation,
    pub owner: Option<Address>,
    pub receiver: Option<Address>,
    pub amount: Option<Amount>,
    pub signature: Option<Vec<u8>>,
}

impl Transaction {
    pub fn new(id: u64, sender: Address, operation: Operation) -> Self {
        Transaction {
            id,
            sender,
            operation,
            owner: None,
            receiver: None,
            amount: None,
            signature: None,
        }
    }

    /// Two-party contract call, e.g. `transfer(receiver, amount)`.
    pub fn contract_call(
        id: u64,
        sender: Address,
        receiver: Option<Address>,
        function_signature: impl Into<String>,
        amount: Option<TokenAmount>,
    ) -> Self {
        Transaction {
            receiver,
            amount: amount.map(Amount::Token),
            ..Transaction::new(id, sender, Operation::ContractCall(function_signature.into()))
        }
    }

    /// Three-party contract call: the sender acts on `owner`'s behalf.
    pub fn delegated_call(
        id: u64,
        sender: Address,
        owner: Address,
        receiver: Address,
        function_signature: impl Into<String>,
        amount: Option<TokenAmount>,
    ) -> Self {
        Transaction {
            owner: Some(owner),
            ..Transaction::contract_call(id, sender, Some(receiver), function_signature, amount)
        }
    }

    pub fn native(
        id: u64,
        sender: Address,
        receiver: Option<Address>,
        tx_type: TransactionType,
        amount: Option<NativeAmount>,
    ) -> Self {
        Transaction {
            receiver,
            amount: amount.map(Amount::Native),
            ..Transaction::new(id, sender, Operation::Native(tx_type))
        }
    }

    pub fn with_owner(mut self, owner: Address) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_receiver(mut self, receiver: Address) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Verifies if transaction has no address besides the sender's.
    pub fn has_no_address(&self) -> bool {
        self.owner.is_none() && self.receiver.is_none()
    }

    /// Verifies if transaction only has a receiver besides the sender.
    pub fn has_one_address(&self) -> bool {
        self.owner.is_none() && self.receiver.is_some()
    }

    /// Verifies if transaction has both an owner and a receiver.
    pub fn has_two_addresses(&self) -> bool {
        self.owner.is_some() && self.receiver.is_some()
    }

    pub fn function_signature(&self) -> Option<&str> {
        match &self.operation {
            Operation::ContractCall(signature) => Some(signature),
            Operation::Native(_) => None,
        }
    }

    pub fn native_operation(&self) -> Option<TransactionType> {
        match self.operation {
            Operation::Native(tx_type) => Some(tx_type),
            Operation::ContractCall(_) => None,
        }
    }

    pub fn token_amount(&self) -> Option<TokenAmount> {
        self.amount.as_ref().and_then(Amount::token)
    }

    pub fn native_amount(&self) -> Option<&NativeAmount> {
        self.amount.as_ref().and_then(Amount::native)
    }

    pub fn signing_payload(&self) -> Result<Vec<u8>, ChainError> {
        self.signing_payload_with(SigningScheme::Legacy)
    }

    /// Comma-joined id, selector, owner, receiver and amount; absent fields
    /// are left out together with their separator.
    ///
    /// The selector goes in verbatim: contract signatures such as
    /// `transfer(address,uint256)` keep their own commas.
    pub fn signing_payload_with(&self, scheme: SigningScheme) -> Result<Vec<u8>, ChainError> {
        let selector = self.operation.selector();
        if selector.is_empty() {
            return Err(ChainError::EncodingError(
                "Empty operation selector cannot be placed in a signing payload".to_string(),
            ));
        }

        let mut fields = vec![self.id.to_string(), selector.to_string()];
        if let Some(owner) = &self.owner {
            fields.push(owner.to_hex());
        }
        if let Some(receiver) = &self.receiver {
            fields.push(receiver.to_hex());
        }
        match (&self.amount, scheme) {
            (Some(Amount::Token(amount)), _) => fields.push(amount.to_canonical_string()?),
            (Some(Amount::Native(amount)), SigningScheme::IncludeNativeAmount) => {
                fields.push(amount.to_string())
            }
            _ => {}
        }
        Ok(fields.join(",").into_bytes())
    }

    pub fn sign(&mut self, signature: Vec<u8>) {
        self.signature = Some(signature);
    }

    pub fn sign_with(&mut self, keypair: &KeyPair) -> Result<(), ChainError> {
        self.sign_with_scheme(keypair, SigningScheme::Legacy)
    }

    pub fn sign_with_scheme(
        &mut self,
        keypair: &KeyPair,
        scheme: SigningScheme,
    ) -> Result<(), ChainError> {
        let payload = self.signing_payload_with(scheme)?;
        let signature = keypair.sign(&payload)?;
        self.sign(signature.to_vec());
        Ok(())
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Base64 form of the signature; the ledger tracks replays by this string.
    pub fn signature_base64(&self) -> Option<String> {
        self.signature.as_ref().map(|sig| STANDARD.encode(sig))
    }
}

/// Identity is `(id, signature)`. An unsigned transaction has no identity and
/// is equal to nothing, itself included.
impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        match (&self.signature, &other.signature) {
            (Some(a), Some(b)) => self.id == other.id && a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("operation", &self.operation)
            .field("amount", &self.amount)
            .field("signed", &self.is_signed())
            .finish_non_exhaustive()
    }
}

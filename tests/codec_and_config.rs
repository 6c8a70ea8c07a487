//! Integration tests for the wire codec and configuration loading

use chaingate::amount::{NativeAmount, TokenAmount};
use chaingate::blockchain::{Blockchain, LedgerContext, NodeRegistry};
use chaingate::config::load_config;
use chaingate::crypto::{KeyPair, Secp256k1KeyManager};
use chaingate::error::ChainError;
use chaingate::transaction::{
    AddressArity, AmountRequirement, SigningScheme, Transaction, TransactionType, Validator,
};
use chaingate::Address;
use std::io::Write;
use tempfile::NamedTempFile;

fn assert_same_fields(a: &Transaction, b: &Transaction) {
    assert_eq!(a.id, b.id);
    assert_eq!(a.sender, b.sender);
    assert_eq!(a.operation, b.operation);
    assert_eq!(a.owner, b.owner);
    assert_eq!(a.receiver, b.receiver);
    assert_eq!(a.amount, b.amount);
    assert_eq!(a.signature, b.signature);
}

#[test]
fn test_roundtrip_with_and_without_addresses() -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::generate()?;
    let owner = Address::from_bytes([0x0f; 20]);
    let receiver = Address::from_bytes([0xf0; 20]);

    let mut samples = vec![
        Transaction::delegated_call(
            1,
            keypair.address(),
            owner,
            receiver,
            "transferFrom(address,address,uint256)",
            Some(TokenAmount::new(12.75)),
        ),
        Transaction::contract_call(
            2,
            keypair.address(),
            Some(receiver),
            "balanceOf(address)",
            None,
        ),
        Transaction::native(3, keypair.address(), None, TransactionType::TotalSupply, None),
        Transaction::native(
            4,
            keypair.address(),
            Some(receiver),
            TransactionType::NativeTransfer,
            Some(NativeAmount::from_display_str("0.123456789012345678")?),
        ),
    ];
    for tx in samples.iter_mut() {
        tx.sign_with(&keypair)?;
    }
    // unsigned variant too
    samples.push(Transaction::native(
        5,
        keypair.address(),
        Some(receiver),
        TransactionType::NativeBalance,
        None,
    ));

    for tx in &samples {
        let json = tx.to_json()?;
        let decoded = Transaction::from_json(&json)?;
        assert_same_fields(tx, &decoded);
        assert_eq!(decoded.signing_payload()?, tx.signing_payload()?);
        if tx.is_signed() {
            assert_eq!(&decoded, tx);
        }
    }
    Ok(())
}

#[test]
fn test_wire_field_names() -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::generate()?;
    let mut tx = Transaction::delegated_call(
        7,
        keypair.address(),
        Address::from_bytes([1; 20]),
        Address::from_bytes([2; 20]),
        "transferFrom(address,address,uint256)",
        Some(TokenAmount::new(1.5)),
    );
    tx.sign_with(&keypair)?;

    let value: serde_json::Value = serde_json::from_str(&tx.to_json()?)?;
    assert_eq!(value["transactionId"], 7);
    assert_eq!(value["functionSignature"], "transferFrom(address,address,uint256)");
    assert_eq!(value["senderAddress"], keypair.address().to_hex());
    assert_eq!(value["ownerAddress"], Address::from_bytes([1; 20]).to_hex());
    assert_eq!(value["receiverAddress"], Address::from_bytes([2; 20]).to_hex());
    assert_eq!(value["amount"], 1.5);
    assert_eq!(value["signature"], tx.signature_base64().unwrap());
    assert!(value.get("nativeOperation").is_none());
    assert!(value.get("weiAmount").is_none());
    Ok(())
}

fn chain_with_client(keypair: &KeyPair) -> Result<Blockchain, ChainError> {
    let mut chain = Blockchain::new();
    chain.register_client(NodeRegistry::from_key(1, keypair.verification_key()))?;
    Ok(chain)
}

/// Contract call with the arguments its operation requires.
fn contract_call(id: u64, sender: Address, tx_type: TransactionType, amount: f64) -> Transaction {
    let shape = tx_type.shape();
    let (owner, receiver) = match shape.addresses {
        AddressArity::NoAddress => (None, None),
        AddressArity::Receiver => (None, Some(Address::from_bytes([0x22; 20]))),
        AddressArity::OwnerAndReceiver => (
            Some(Address::from_bytes([0x11; 20])),
            Some(Address::from_bytes([0x22; 20])),
        ),
    };
    let amount = match shape.amount {
        AmountRequirement::Token => Some(TokenAmount::new(amount)),
        _ => None,
    };
    let signature = tx_type.contract_signature().unwrap_or_default();
    let mut tx = Transaction::contract_call(id, sender, receiver, signature, amount);
    tx.owner = owner;
    tx
}

#[test]
fn test_default_contract_signatures_are_admitted_after_decoding(
) -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::generate()?;
    let chain = chain_with_client(&keypair)?;
    let validator = Validator::default();

    let contract_types: Vec<_> = TransactionType::ALL
        .into_iter()
        .filter(|t| t.contract_signature().is_some())
        .collect();
    assert_eq!(contract_types.len(), 9);

    for (id, tx_type) in (1..).zip(contract_types) {
        let mut tx = contract_call(id, keypair.address(), tx_type, 42.5);
        tx.sign_with(&keypair)?;

        let received = Transaction::from_json(&tx.to_json()?)?;
        assert_eq!(received, tx);
        assert_eq!(
            validator.admit(&received, &chain, &Secp256k1KeyManager),
            Ok(tx_type),
            "{} should be admitted",
            tx_type
        );
    }
    assert_eq!(chain.seen_count(), 9);
    Ok(())
}

#[test]
fn test_full_precision_amounts_are_admitted_after_decoding(
) -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::generate()?;
    let chain = chain_with_client(&keypair)?;
    let validator = Validator::default();

    let amounts = [
        3.9430133835633675e-10,
        0.1 + 0.2,
        1234.5678901234567,
        98765432.1234567,
        2.2250738585072014e-308,
        6.02214076e23,
    ];
    for (id, value) in (100..).zip(amounts) {
        let mut tx = contract_call(id, keypair.address(), TransactionType::TransferFrom, value);
        tx.sign_with(&keypair)?;

        let received = Transaction::from_json(&tx.to_json()?)?;
        assert_eq!(received.token_amount(), Some(TokenAmount::new(value)));
        assert_eq!(
            validator.admit(&received, &chain, &Secp256k1KeyManager),
            Ok(TransactionType::TransferFrom),
            "amount {:e} should survive the wire",
            value
        );
    }
    Ok(())
}

#[test]
fn test_non_finite_amount_cannot_be_sent() -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::generate()?;
    let tx = contract_call(1, keypair.address(), TransactionType::Transfer, f64::NAN);
    assert!(matches!(tx.to_json(), Err(ChainError::EncodingError(_))));
    Ok(())
}

#[test]
fn test_decoded_transaction_validates() -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::generate()?;
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"
[node]
id = 1
signing_scheme = "include-native-amount"

[[clients]]
id = 4
address = "{}"
public_key = "{}"
"#,
        keypair.address(),
        keypair.verification_key().to_hex()
    )?;

    let config = load_config(file.path())?;
    let chain = Blockchain::from_config(&config)?;
    assert!(chain.resolve_client(&keypair.address()).is_some());

    let mut tx = Transaction::native(
        1,
        keypair.address(),
        Some(Address::from_bytes([9; 20])),
        TransactionType::NativeTransfer,
        Some(NativeAmount::from_display_str("3")?),
    );
    tx.sign_with_scheme(&keypair, SigningScheme::IncludeNativeAmount)?;

    let received = Transaction::from_json(&tx.to_json()?)?;
    let validator = Validator::new(config.node.signing_scheme);
    assert_eq!(
        validator.admit(&received, &chain, &Secp256k1KeyManager),
        Ok(TransactionType::NativeTransfer)
    );
    Ok(())
}

#[test]
fn test_missing_config_file_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = load_config(dir.path().join("absent.toml"))?;
    assert!(config.clients.is_empty());
    assert_eq!(config.node.signing_scheme, SigningScheme::Legacy);
    Ok(())
}

#[test]
fn test_malformed_config_file_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        "[[clients]]\nid = 1\naddress = \"0x12\"\npublic_key = \"02\""
    )?;
    let result = load_config(file.path());
    assert!(matches!(result, Err(ChainError::ConfigError(_))));
    Ok(())
}

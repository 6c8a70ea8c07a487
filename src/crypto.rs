//! Cryptographic primitives for ChainGate

use crate::address::{Address, ADDRESS_LENGTH};
use crate::error::ChainError;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::{COMPACT_SIGNATURE_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE},
    ecdsa::Signature,
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};
use std::fmt;

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Key a registered client's signatures are checked against.
///
/// Holds the raw key bytes; whether they form a valid key is up to the
/// [`KeyManager`] that consumes them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VerificationKey(Vec<u8>);

impl VerificationKey {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        VerificationKey(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, ChainError> {
        let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        hex::decode(digits)
            .map(VerificationKey)
            .map_err(|e| ChainError::DecodingError(format!("Invalid hex public key: {}", e)))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Address owned by this key: the right-most 20 bytes of its SHA-256 hash.
    pub fn address(&self) -> Address {
        let digest: [u8; 32] = Sha256::digest(&self.0).into();
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[32 - ADDRESS_LENGTH..]);
        Address::from_bytes(bytes)
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationKey({})", self.to_hex())
    }
}

/// Signature checking collaborator used by the validation engine.
pub trait KeyManager: Send + Sync {
    /// Returns `Ok(false)` when a well-formed signature does not match, and an
    /// error when the key or signature cannot be interpreted at all.
    fn verify(
        &self,
        payload: &[u8],
        signature: &[u8],
        key: &VerificationKey,
    ) -> Result<bool, ChainError>;
}

/// ECDSA over secp256k1 with SHA-256 message digests and compact signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1KeyManager;

impl KeyManager for Secp256k1KeyManager {
    fn verify(
        &self,
        payload: &[u8],
        signature: &[u8],
        key: &VerificationKey,
    ) -> Result<bool, ChainError> {
        check_signature(key.as_bytes(), payload, signature)
    }
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Result<Self, ChainError> {
        let secret_key = SecretKey::new(&mut OsRng);
        Ok(Self::from_secret_key(secret_key))
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, ChainError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                ChainError::CryptoError(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                ChainError::CryptoError(format!("Invalid secret key bytes: {}", e))
            }
        })?;

        Ok(Self::from_secret_key(secret_key))
    }

    pub fn from_secret_hex(hex_str: &str) -> Result<Self, ChainError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| ChainError::CryptoError(format!("Invalid hex secret key: {}", e)))?;
        Self::from_secret_bytes(&bytes)
    }

    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Returns the KeyPair's public key as a compressed byte array.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public_key.serialize()
    }

    pub fn verification_key(&self) -> VerificationKey {
        VerificationKey::from_bytes(self.public_key_bytes().to_vec())
    }

    pub fn address(&self) -> Address {
        self.verification_key().address()
    }

    /// Signs the SHA-256 digest of `message` and returns the compact signature.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE], ChainError> {
        let digest = Sha256::digest(message);

        let message = Message::from_digest_slice(&digest)
            .map_err(|e| ChainError::CryptoError(format!("Failed to create message: {}", e)))?;

        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret_key);
        Ok(signature.serialize_compact())
    }
}

/// `Ok(false)` only for a well-formed signature that does not match.
fn check_signature(
    public_key_bytes: &[u8],
    message: &[u8],
    signature_bytes: &[u8],
) -> Result<bool, ChainError> {
    if public_key_bytes.len() != PUBLIC_KEY_SIZE {
        return Err(ChainError::CryptoError(format!(
            "Public key must be exactly {} bytes (compressed), got {}",
            PUBLIC_KEY_SIZE,
            public_key_bytes.len()
        )));
    }
    if signature_bytes.len() != COMPACT_SIGNATURE_SIZE {
        return Err(ChainError::CryptoError(format!(
            "Signature must be exactly {} bytes (compact), got {}",
            COMPACT_SIGNATURE_SIZE,
            signature_bytes.len()
        )));
    }

    let public_key = PublicKey::from_slice(public_key_bytes)
        .map_err(|e| ChainError::CryptoError(format!("Invalid public key: {}", e)))?;

    let digest = Sha256::digest(message);

    let message = Message::from_digest_slice(&digest)
        .map_err(|e| ChainError::CryptoError(format!("Failed to create message: {}", e)))?;

    let signature = Signature::from_compact(signature_bytes)
        .map_err(|e| ChainError::CryptoError(format!("Invalid signature: {}", e)))?;

    Ok(SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, &public_key)
        .is_ok())
}

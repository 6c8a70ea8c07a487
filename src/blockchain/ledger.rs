use crate::address::Address;
use crate::blockchain::registry::{ClientRegistry, NodeRegistry};
use crate::config::Config;
use crate::crypto::VerificationKey;
use crate::error::ChainError;
use crate::transaction::TransactionType;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Ledger state the validation engine consults.
///
/// Implementations own replay bookkeeping: `mark_seen` must be an atomic
/// test-and-set so that two transactions racing with the same signature
/// cannot both be recorded.
pub trait LedgerContext {
    /// Verification key of the registered client at `address`.
    fn resolve_client(&self, address: &Address) -> Option<VerificationKey>;

    /// Whether a signature (Base64 form) was already recorded.
    fn is_replayed(&self, signature: &str) -> bool;

    /// Operation implemented by a contract function signature.
    fn resolve_type(&self, function_signature: &str) -> Option<TransactionType>;

    /// Records a signature. Returns `false` if it was already recorded.
    fn mark_seen(&self, signature: &str) -> bool;
}

/// In-memory ledger context.
#[derive(Debug)]
pub struct Blockchain {
    clients: ClientRegistry,
    functions: HashMap<String, TransactionType>,
    seen_signatures: Mutex<HashSet<String>>,
}

impl Blockchain {
    /// Empty client registry, function table holding every contract operation.
    pub fn new() -> Self {
        let functions = TransactionType::ALL
            .into_iter()
            .filter_map(|t| t.contract_signature().map(|sig| (sig.to_string(), t)))
            .collect();
        Blockchain {
            clients: ClientRegistry::new(),
            functions,
            seen_signatures: Mutex::new(HashSet::new()),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ChainError> {
        let mut chain = Blockchain::new();
        for client in &config.clients {
            let address = Address::from_hex(&client.address)?;
            let public_key = VerificationKey::from_hex(&client.public_key)?;
            chain.register_client(NodeRegistry::new(client.id, address, public_key))?;
        }
        for (signature, type_name) in &config.contract.functions {
            let tx_type = type_name.parse::<TransactionType>().map_err(|e| {
                ChainError::ConfigError(format!("Function '{}': {}", signature, e))
            })?;
            chain.register_function(signature.clone(), tx_type);
        }
        if chain.clients.is_empty() {
            warn!(
                "Node {} has no registered clients; every transaction will be rejected",
                config.node.id
            );
        }
        debug!(
            "Ledger context for node {} ready: {} clients, {} contract functions",
            config.node.id,
            chain.clients.len(),
            chain.functions.len()
        );
        Ok(chain)
    }

    pub fn register_client(&mut self, client: NodeRegistry) -> Result<(), ChainError> {
        self.clients.register(client)
    }

    pub fn register_function(&mut self, signature: impl Into<String>, tx_type: TransactionType) {
        self.functions.insert(signature.into(), tx_type);
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn seen_count(&self) -> usize {
        self.seen_signatures.lock().len()
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerContext for Blockchain {
    fn resolve_client(&self, address: &Address) -> Option<VerificationKey> {
        self.clients.get(address).map(|c| c.public_key.clone())
    }

    fn is_replayed(&self, signature: &str) -> bool {
        self.seen_signatures.lock().contains(signature)
    }

    fn resolve_type(&self, function_signature: &str) -> Option<TransactionType> {
        self.functions.get(function_signature).copied()
    }

    fn mark_seen(&self, signature: &str) -> bool {
        self.seen_signatures.lock().insert(signature.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, Config};
    use crate::crypto::KeyPair;

    #[test]
    fn test_default_function_table() {
        let chain = Blockchain::new();
        assert_eq!(
            chain.resolve_type("transfer(address,uint256)"),
            Some(TransactionType::Transfer)
        );
        assert_eq!(
            chain.resolve_type("transferFrom(address,address,uint256)"),
            Some(TransactionType::TransferFrom)
        );
        assert_eq!(chain.resolve_type("totalSupply()"), Some(TransactionType::TotalSupply));
        assert_eq!(chain.resolve_type("mint(address,uint256)"), None);
    }

    #[test]
    fn test_mark_seen_is_test_and_set() {
        let chain = Blockchain::new();
        assert!(!chain.is_replayed("c2lnbmF0dXJl"));
        assert!(chain.mark_seen("c2lnbmF0dXJl"));
        assert!(!chain.mark_seen("c2lnbmF0dXJl"));
        assert!(chain.is_replayed("c2lnbmF0dXJl"));
        assert_eq!(chain.seen_count(), 1);
    }

    #[test]
    fn test_from_config() {
        let keypair = KeyPair::generate().unwrap();
        let mut config = Config::default();
        config.clients.push(ClientConfig {
            id: 7,
            address: keypair.address().to_hex(),
            public_key: keypair.verification_key().to_hex(),
        });
        config
            .contract
            .functions
            .insert("transfer".to_string(), "TRANSFER".to_string());

        let chain = Blockchain::from_config(&config).unwrap();
        assert_eq!(
            chain.resolve_client(&keypair.address()),
            Some(keypair.verification_key())
        );
        assert_eq!(chain.resolve_type("transfer"), Some(TransactionType::Transfer));
    }

    #[test]
    fn test_from_config_without_clients() {
        let chain = Blockchain::from_config(&Config::default()).unwrap();
        assert!(chain.clients().is_empty());
        assert_eq!(chain.resolve_type("totalSupply()"), Some(TransactionType::TotalSupply));
    }

    #[test]
    fn test_from_config_rejects_unknown_type() {
        let mut config = Config::default();
        config
            .contract
            .functions
            .insert("mint".to_string(), "MINT".to_string());
        let result = Blockchain::from_config(&config);
        assert!(matches!(result, Err(ChainError::ConfigError(_))));
    }
}

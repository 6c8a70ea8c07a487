use crate::address::Address;
use crate::crypto::VerificationKey;
use crate::error::ChainError;
use std::collections::HashMap;

/// A client known to the ledger and the key its transactions are signed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRegistry {
    pub id: u32,
    pub address: Address,
    pub public_key: VerificationKey,
}

impl NodeRegistry {
    pub fn new(id: u32, address: Address, public_key: VerificationKey) -> Self {
        NodeRegistry {
            id,
            address,
            public_key,
        }
    }

    /// Registry entry whose address is derived from its key.
    pub fn from_key(id: u32, public_key: VerificationKey) -> Self {
        let address = public_key.address();
        NodeRegistry::new(id, address, public_key)
    }
}

/// Registered clients indexed by address.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: HashMap<Address, NodeRegistry>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client. An address can only be registered once.
    pub fn register(&mut self, client: NodeRegistry) -> Result<(), ChainError> {
        if self.clients.contains_key(&client.address) {
            return Err(ChainError::ConfigError(format!(
                "Client address {} is registered twice",
                client.address
            )));
        }
        self.clients.insert(client.address, client);
        Ok(())
    }

    pub fn get(&self, address: &Address) -> Option<&NodeRegistry> {
        self.clients.get(address)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

//! Configuration management for ChainGate

use crate::address::Address;
use crate::crypto::VerificationKey;
use crate::error::ChainError;
use crate::transaction::{SigningScheme, TransactionType};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub clients: Vec<ClientConfig>,
    #[serde(default)]
    pub contract: ContractConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub id: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub signing_scheme: SigningScheme,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            id: 0,
            log_level: default_log_level(),
            signing_scheme: SigningScheme::default(),
        }
    }
}

/// A registered client: `address` and hex `public_key` of its signing key.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub id: u32,
    pub address: String,
    pub public_key: String,
}

/// Extra contract function signatures, mapped to transaction type names.
/// The standard token signatures are always known.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractConfig {
    #[serde(default)]
    pub functions: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Loads the configuration at `path`. A missing file yields the defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ChainError> {
    let path = path.as_ref();
    let config = if path.exists() {
        let config_str = fs::read_to_string(path)?;
        parse_config(&config_str)?
    } else {
        Config::default()
    };
    validate_config(&config)?;
    Ok(config)
}

pub fn parse_config(config_str: &str) -> Result<Config, ChainError> {
    Ok(toml::from_str(config_str)?)
}

/// Checks the values that `toml` cannot.
pub fn validate_config(config: &Config) -> Result<(), ChainError> {
    if config.node.log_level.trim().is_empty() {
        return Err(ChainError::ConfigError(
            "node.log_level must not be empty".to_string(),
        ));
    }

    let mut addresses = HashSet::new();
    for client in &config.clients {
        let address = Address::from_hex(&client.address).map_err(|e| {
            ChainError::ConfigError(format!("Client {} address: {}", client.id, e))
        })?;
        VerificationKey::from_hex(&client.public_key).map_err(|e| {
            ChainError::ConfigError(format!("Client {} public key: {}", client.id, e))
        })?;
        if !addresses.insert(address) {
            return Err(ChainError::ConfigError(format!(
                "Client address {} is registered twice",
                address
            )));
        }
    }

    for (signature, type_name) in &config.contract.functions {
        type_name.parse::<TransactionType>().map_err(|e| {
            ChainError::ConfigError(format!("Function '{}': {}", signature, e))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[node]
id = 3
log_level = "debug"
signing_scheme = "include-native-amount"

[[clients]]
id = 1
address = "0x1111111111111111111111111111111111111111"
public_key = "02aa"

[contract.functions]
"transfer" = "TRANSFER"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.node.id, 3);
        assert_eq!(config.node.log_level, "debug");
        assert_eq!(config.node.signing_scheme, SigningScheme::IncludeNativeAmount);
        assert_eq!(config.clients.len(), 1);
        assert_eq!(config.contract.functions["transfer"], "TRANSFER");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.node.log_level, "info");
        assert_eq!(config.node.signing_scheme, SigningScheme::Legacy);
        assert!(config.clients.is_empty());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = parse_config(SAMPLE).unwrap();
        config.clients[0].address = "0x1234".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ChainError::ConfigError(_))
        ));

        let mut config = parse_config(SAMPLE).unwrap();
        let duplicate = config.clients[0].clone();
        config.clients.push(duplicate);
        assert!(validate_config(&config)
            .unwrap_err()
            .to_string()
            .contains("registered twice"));

        let mut config = parse_config(SAMPLE).unwrap();
        config
            .contract
            .functions
            .insert("burn".to_string(), "BURN".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let result = parse_config("[node\nid = ");
        assert!(matches!(result, Err(ChainError::ConfigError(_))));
    }
}

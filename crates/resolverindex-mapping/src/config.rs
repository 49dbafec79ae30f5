//! Mapping configuration.

use alloy_primitives::Address;
use resolverindex_core::ids::hex_id;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::telemetry::LogConfig;

/// Top-level mapping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Chain slug, used in log output.
    #[serde(default = "default_chain")]
    pub chain: String,
    /// Resolver contracts to index (empty = every contract the host delivers).
    #[serde(default)]
    pub contracts: Vec<String>,
    /// Read text values back out of transaction input when the log omits them.
    #[serde(default = "bool_true")]
    pub recover_text_values: bool,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_chain() -> String {
    "ethereum".into()
}
fn bool_true() -> bool {
    true
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            chain: default_chain(),
            contracts: vec![],
            recover_text_values: true,
            log: LogConfig::default(),
        }
    }
}

impl MappingConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every configured contract is a well-formed address and every
    /// log level is one `tracing` knows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log.validate()?;
        for address in &self.contracts {
            let digits = address.strip_prefix("0x").unwrap_or("");
            if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::InvalidContract {
                    address: address.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns `true` if logs from `address` should be handled.
    pub fn matches_contract(&self, address: &Address) -> bool {
        if self.contracts.is_empty() {
            return true;
        }
        let address = hex_id(address);
        self.contracts.iter().any(|c| c.eq_ignore_ascii_case(&address))
    }
}

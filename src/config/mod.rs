use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Gateway configuration, loaded from a TOML file.
///
/// Everything has a default so the gateway runs against a local RSK regtest
/// node with no config file at all.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// HTTP JSON-RPC endpoint of the node
    #[serde(default = "default_node_url")]
    pub node_url: String,

    /// EIP-155 chain id for replay-protected signing; absent signs plain
    /// legacy transactions
    #[serde(default)]
    pub chain_id: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            chain_id: None,
        }
    }
}

fn default_node_url() -> String {
    "http://localhost:4444".to_string()
}

pub fn load() -> GatewayConfig {
    let Some(path) = config_path() else {
        return GatewayConfig::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return GatewayConfig::default(),
    };
    toml::from_str::<GatewayConfig>(&content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("RSK_GATEWAY_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("rsk-gateway").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("rsk-gateway").join("config.toml"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.node_url, "http://localhost:4444");
        assert_eq!(config.chain_id, None);
    }

    #[test]
    fn test_parse_toml() {
        let config: GatewayConfig =
            toml::from_str("node_url = \"http://10.0.0.5:4444\"\nchain_id = 31\n").unwrap();
        assert_eq!(config.node_url, "http://10.0.0.5:4444");
        assert_eq!(config.chain_id, Some(31));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: GatewayConfig = toml::from_str("chain_id = 30\n").unwrap();
        assert_eq!(config.node_url, "http://localhost:4444");
        assert_eq!(config.chain_id, Some(30));
    }
}

//! Node configuration with TOML file support.

use crate::NodeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a Volta node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for chain storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Port the consensus transport listens on.
    #[serde(default = "default_consensus_port")]
    pub consensus_port: u16,

    /// Maximum number of delegates elected per epoch.
    #[serde(default = "default_delegate_size")]
    pub delegate_size: u32,

    /// Number of M-blocks between two K-blocks.
    #[serde(default = "default_epoch_blocks")]
    pub epoch_blocks: u64,

    /// Base round interval in seconds before timeout backoff.
    #[serde(default = "default_round_interval_secs")]
    pub round_interval_secs: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            consensus_port: default_consensus_port(),
            delegate_size: default_delegate_size(),
            epoch_blocks: default_epoch_blocks(),
            round_interval_secs: default_round_interval_secs(),
            log_level: default_log_level(),
        }
    }
}

impl NodeConfig {
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, NodeError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("read {}: {e}", path.display())))?;
        toml::from_str(&contents).map_err(|e| NodeError::Config(e.to_string()))
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./volta_data")
}

fn default_consensus_port() -> u16 {
    8670
}

fn default_delegate_size() -> u32 {
    21
}

fn default_epoch_blocks() -> u64 {
    240
}

fn default_round_interval_secs() -> u64 {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

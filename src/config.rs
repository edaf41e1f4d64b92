//! Configuration for bitacora

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::StorageError;

/// Default storage directory
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bitacora")
}

/// Which key-value substrate holds the collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local map, nothing survives exit
    Memory,
    /// Single SQLite file (`bitacora.db`)
    #[default]
    Sqlite,
    /// sled tree (`collections.sled`)
    Sled,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Memory => "memory",
            Backend::Sqlite => "sqlite",
            Backend::Sled => "sled",
        };
        f.write_str(name)
    }
}

impl FromStr for Backend {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "sqlite" => Ok(Backend::Sqlite),
            "sled" => Ok(Backend::Sled),
            other => Err(StorageError::Config(format!(
                "unknown backend '{}' (expected memory, sqlite or sled)",
                other
            ))),
        }
    }
}

/// How `ConsultantId` references are treated on create/update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Store any reference; dangling ones resolve to "no client" when read
    #[default]
    Lenient,
    /// Reject references to clients that do not exist
    Enforced,
}

/// Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the on-disk backends
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Storage backend
    #[serde(default)]
    pub backend: Backend,

    /// Prefix prepended to every collection key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Foreign key handling
    #[serde(default)]
    pub reference_policy: ReferencePolicy,

    /// sled page cache size in bytes
    #[serde(default = "default_sled_cache_bytes")]
    pub sled_cache_bytes: u64,
}

fn default_key_prefix() -> String {
    "bitacora_".to_string()
}

fn default_sled_cache_bytes() -> u64 {
    16 * 1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            backend: Backend::default(),
            key_prefix: default_key_prefix(),
            reference_policy: ReferencePolicy::default(),
            sled_cache_bytes: default_sled_cache_bytes(),
        }
    }
}

impl Config {
    /// In-memory configuration, used by tests and dry runs
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory,
            ..Default::default()
        }
    }

    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| StorageError::Config(e.to_string()))
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StorageError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| StorageError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// SQLite database path
    pub fn sqlite_path(&self) -> PathBuf {
        self.storage_dir.join("bitacora.db")
    }

    /// sled database path
    pub fn sled_path(&self) -> PathBuf {
        self.storage_dir.join("collections.sled")
    }

    /// Config file path inside the storage directory
    pub fn config_path(&self) -> PathBuf {
        self.storage_dir.join("config.toml")
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::output::TabExpansion;
use crate::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "wss://sonolang.com/wss";

/// Example files the public server ships.
pub const DEFAULT_EXAMPLES: &[&str] = &[
    "SOE.so",
    "threads.so",
    "transformer.so",
    "datasetgen.so",
    "deu.so",
    "epenthesis.so",
    "fibonacci.so",
    "findnatural.so",
    "hello.so",
    "hilo.so",
    "jpn.so",
    "maptest.so",
    "nah.so",
    "naturalsets.so",
    "nn_adder.so",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket URL of the interpreter server.
    pub endpoint: String,
    /// Example files offered by `:examples`.
    pub examples: Vec<String>,
    pub tab_expansion: TabExpansion,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            examples: DEFAULT_EXAMPLES.iter().map(|s| s.to_string()).collect(),
            tab_expansion: TabExpansion::default(),
        }
    }
}

fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("sono")
}

pub fn default_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

impl ClientConfig {
    /// Read a config file. Missing fields fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `path` if given, else the default location when it exists, else
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = default_config_path();
        if default_path.exists() {
            debug!("Loading config from {}", default_path.display());
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }
}

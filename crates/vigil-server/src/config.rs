use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Directory holding the rolling and daily attack logs.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Root directory scanned for model artifacts at startup.
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
    /// Bounded capacity of the in-memory alert buffer.
    #[serde(default = "default_store_capacity")]
    pub store_capacity: usize,
    /// Upper bound on a single scorer invocation before the random
    /// fallback takes over.
    #[serde(default = "default_scoring_timeout_secs")]
    pub scoring_timeout_secs: u64,
    /// CORS allowed origins; empty allows all (development mode).
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "default_simulator_enabled")]
    pub enabled: bool,
    #[serde(default = "default_simulator_interval_secs")]
    pub interval_secs: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_simulator_enabled(),
            interval_secs: default_simulator_interval_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            data_dir: default_data_dir(),
            models_dir: default_models_dir(),
            store_capacity: default_store_capacity(),
            scoring_timeout_secs: default_scoring_timeout_secs(),
            cors_allowed_origins: Vec::new(),
            simulator: SimulatorConfig::default(),
        }
    }
}

fn default_http_port() -> u16 {
    5000
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_models_dir() -> String {
    "models".to_string()
}

fn default_store_capacity() -> usize {
    200
}

fn default_scoring_timeout_secs() -> u64 {
    2
}

fn default_simulator_enabled() -> bool {
    true
}

fn default_simulator_interval_secs() -> u64 {
    5
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not
    /// exist. The system runs fine config-free; a present but malformed
    /// file is still an error.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            tracing::info!(path, "No config file, using defaults");
            Ok(Self::default())
        }
    }
}

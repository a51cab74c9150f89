use crate::config::ServerConfig;
use crate::gateway::ScoringGateway;
use std::sync::Arc;
use std::time::Duration;
use vigil_model::registry::ModelRegistry;
use vigil_store::logfile::DurableLog;
use vigil_store::reader::AlertReader;
use vigil_store::store::AlertStore;

/// Shared handles passed to every request handler and the background
/// traffic generator. Constructed once at startup; no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub store: Arc<AlertStore>,
    pub log: Arc<DurableLog>,
    pub reader: Arc<AlertReader>,
    pub gateway: Arc<ScoringGateway>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wires the full pipeline from a config. Fails only on unrecoverable
    /// startup conditions (log directory creation).
    pub fn build(config: ServerConfig, registry: ModelRegistry) -> anyhow::Result<Self> {
        let registry = Arc::new(registry);
        let store = Arc::new(AlertStore::new(config.store_capacity));
        let log = Arc::new(DurableLog::new(std::path::Path::new(&config.data_dir))?);
        let reader = Arc::new(AlertReader::new(store.clone(), log.clone()));
        let gateway = Arc::new(ScoringGateway::new(
            registry.clone(),
            store.clone(),
            log.clone(),
            Duration::from_secs(config.scoring_timeout_secs),
        ));
        Ok(Self {
            registry,
            store,
            log,
            reader,
            gateway,
            config: Arc::new(config),
        })
    }
}

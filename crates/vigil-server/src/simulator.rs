use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use vigil_common::types::AlertRecord;
use vigil_store::store::AlertStore;

static SIMULATOR_RUNNING: AtomicBool = AtomicBool::new(false);

/// Spawns the synthetic traffic generator: one alert into the in-memory
/// store per tick, forever. Generated records never touch the durable
/// log, so restarts do not replay synthetic noise.
///
/// At most one generator runs per process; a second call is a no-op and
/// returns `None`.
pub fn spawn(store: Arc<AlertStore>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if SIMULATOR_RUNNING.swap(true, Ordering::SeqCst) {
        tracing::warn!("Synthetic traffic generator already running, not spawning another");
        return None;
    }
    tracing::info!(interval_secs, "Starting synthetic traffic generator");
    Some(tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(interval_secs));
        // The first tick fires immediately; skip it so startup is quiet.
        tick.tick().await;
        loop {
            tick.tick().await;
            let record = AlertRecord::synthetic();
            tracing::debug!(
                attack = %record.model_or_attack,
                level = %record.level,
                "Generated synthetic alert"
            );
            store.push_synthetic(record);
        }
    }))
}

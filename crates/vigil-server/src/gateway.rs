use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use vigil_common::types::{placeholder_keys, AlertRecord, Label};
use vigil_model::registry::ModelRegistry;
use vigil_store::logfile::DurableLog;
use vigil_store::store::AlertStore;

/// Request-level rejections. Everything else the gateway recovers from
/// locally: scorer failure, timeout, and persistence failure all leave the
/// request successful.
#[derive(Debug, PartialEq, Eq)]
pub enum ScoreError {
    /// The model key matched neither the registry nor the placeholder set.
    UnknownModel,
    /// The payload is missing the required `input` field.
    MissingInput,
}

/// Resolves model keys, obtains a score, classifies it, and routes the
/// resulting alert record into the store and the durable log.
pub struct ScoringGateway {
    registry: Arc<ModelRegistry>,
    store: Arc<AlertStore>,
    log: Arc<DurableLog>,
    placeholders: HashSet<String>,
    timeout: Duration,
}

impl ScoringGateway {
    pub fn new(
        registry: Arc<ModelRegistry>,
        store: Arc<AlertStore>,
        log: Arc<DurableLog>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            store,
            log,
            placeholders: placeholder_keys().into_iter().collect(),
            timeout,
        }
    }

    /// Whether `key` is servable at all: registered or a placeholder.
    pub fn knows(&self, key: &str) -> bool {
        self.registry.contains(key) || self.placeholders.contains(key)
    }

    /// Scores `payload` against `key` and records the resulting alert.
    ///
    /// Rejections happen before any scoring. Once scoring starts, nothing
    /// fails the request: scorer errors fall back to a random score and
    /// log-append failures are swallowed by the durable log itself.
    pub async fn score(
        &self,
        key: &str,
        payload: &serde_json::Value,
    ) -> Result<(f64, Label), ScoreError> {
        if !self.knows(key) {
            return Err(ScoreError::UnknownModel);
        }
        if payload.get("input").is_none() {
            return Err(ScoreError::MissingInput);
        }

        let score = match self.invoke_scorer(key, payload).await {
            Some(score) => score,
            None => random_score(),
        };
        let label = Label::from_score(score);

        let source = payload
            .get("src_ip")
            .and_then(|v| v.as_str())
            .unwrap_or("device");
        let record = AlertRecord::scored(key, score, label, source);
        self.store.push_scored(record.clone());
        self.log.append(&record);

        Ok((score, label))
    }

    /// Runs the registered scorer for `key` on a blocking task, bounded by
    /// the configured timeout. Returns `None` for placeholder keys and for
    /// every failure mode (error, panic, timeout, non-finite result).
    async fn invoke_scorer(&self, key: &str, payload: &serde_json::Value) -> Option<f64> {
        if !self.registry.contains(key) {
            return None;
        }
        let registry = self.registry.clone();
        let key_owned = key.to_string();
        let payload = payload.clone();
        let task = tokio::task::spawn_blocking(move || {
            registry
                .lookup(&key_owned)
                .map(|scorer| scorer.score(&payload))
        });
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Some(Ok(score)))) if score.is_finite() => Some(score),
            Ok(Ok(Some(Ok(score)))) => {
                tracing::warn!(key, score, "Scorer returned non-finite value, using fallback");
                None
            }
            Ok(Ok(Some(Err(e)))) => {
                tracing::warn!(key, error = %e, "Scorer failed, using fallback");
                None
            }
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                tracing::warn!(key, error = %e, "Scorer task panicked, using fallback");
                None
            }
            Err(_) => {
                tracing::warn!(key, timeout_secs = self.timeout.as_secs(), "Scorer timed out, using fallback");
                None
            }
        }
    }
}

/// Uniform random score in `[0, 1]`, rounded to three decimals.
fn random_score() -> f64 {
    let raw: f64 = rand::thread_rng().gen_range(0.0..=1.0);
    (raw * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn gateway(dir: &TempDir) -> ScoringGateway {
        ScoringGateway::new(
            Arc::new(ModelRegistry::empty()),
            Arc::new(AlertStore::default()),
            Arc::new(DurableLog::new(dir.path()).unwrap()),
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn unknown_key_is_rejected_before_scoring() {
        let dir = TempDir::new().unwrap();
        let gw = gateway(&dir);
        let err = gw
            .score("definitely-not-a-model", &json!({"input": 1}))
            .await
            .unwrap_err();
        assert_eq!(err, ScoreError::UnknownModel);
    }

    #[tokio::test]
    async fn missing_input_is_a_client_error() {
        let dir = TempDir::new().unwrap();
        let gw = gateway(&dir);
        let err = gw.score("model1", &json!({})).await.unwrap_err();
        assert_eq!(err, ScoreError::MissingInput);
    }

    #[tokio::test]
    async fn placeholder_key_scores_and_records() {
        let dir = TempDir::new().unwrap();
        let gw = gateway(&dir);
        let (score, label) = gw
            .score("model1", &json!({"input": [1, 2], "src_ip": "10.1.1.1"}))
            .await
            .unwrap();
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(label, Label::from_score(score));

        let recent = gw.store.recent(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].model_or_attack, "model1");
        assert_eq!(recent[0].source, "10.1.1.1");

        let rolling = std::fs::read_to_string(dir.path().join("attacks.log")).unwrap();
        assert_eq!(rolling.lines().count(), 1);
    }

    #[tokio::test]
    async fn source_defaults_to_device() {
        let dir = TempDir::new().unwrap();
        let gw = gateway(&dir);
        gw.score("model2", &json!({"input": 0})).await.unwrap();
        assert_eq!(gw.store.recent(1)[0].source, "device");
    }

    #[tokio::test]
    async fn registered_model_scores_deterministically() {
        let dir = TempDir::new().unwrap();
        let models = TempDir::new().unwrap();
        std::fs::write(models.path().join("net.joblib"), b"weights").unwrap();
        let gw = ScoringGateway::new(
            Arc::new(ModelRegistry::load_all(models.path())),
            Arc::new(AlertStore::default()),
            Arc::new(DurableLog::new(dir.path()).unwrap()),
            Duration::from_secs(2),
        );
        let payload = json!({"input": 42});
        let (a, _) = gw.score("net", &payload).await.unwrap();
        let (b, _) = gw.score("net", &payload).await.unwrap();
        assert_eq!(a, b);
    }
}

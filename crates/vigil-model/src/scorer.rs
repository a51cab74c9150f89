use anyhow::Result;
use std::hash::{DefaultHasher, Hash, Hasher};

/// A loaded scoring implementation.
///
/// Implementations must be `Send + Sync`: the registry is shared across
/// every request-handling task for the process lifetime. Scoring runs on a
/// blocking task under a timeout, so implementations may block.
pub trait Scorer: Send + Sync {
    /// Produces a likelihood in `[0, 1]` for the given payload.
    ///
    /// Errors and non-finite values are recovered by the gateway with a
    /// random fallback score; they never fail the request.
    fn score(&self, payload: &serde_json::Value) -> Result<f64>;
}

/// Placeholder scorer backed by a loaded artifact blob.
///
/// Real inference is out of scope; this derives a stable score from a
/// digest of the blob and the payload's `input` field, so a registered
/// artifact behaves deterministically and distinctly from the random
/// fallback path. Swapping in a genuine inference backend only means
/// replacing the loader that constructs this.
pub struct BlobScorer {
    blob_digest: u64,
}

impl BlobScorer {
    pub fn new(blob: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        blob.hash(&mut hasher);
        Self {
            blob_digest: hasher.finish(),
        }
    }
}

impl Scorer for BlobScorer {
    fn score(&self, payload: &serde_json::Value) -> Result<f64> {
        let input = payload
            .get("input")
            .ok_or_else(|| anyhow::anyhow!("payload has no 'input' field"))?;
        let mut hasher = DefaultHasher::new();
        self.blob_digest.hash(&mut hasher);
        input.to_string().hash(&mut hasher);
        // Map the digest into [0, 1] at three decimal places.
        Ok((hasher.finish() % 1001) as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blob_scorer_is_deterministic_and_bounded() {
        let scorer = BlobScorer::new(b"artifact-bytes");
        let payload = json!({"input": [1, 2, 3]});
        let a = scorer.score(&payload).unwrap();
        let b = scorer.score(&payload).unwrap();
        assert_eq!(a, b);
        assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn blob_scorer_varies_with_input() {
        let scorer = BlobScorer::new(b"artifact-bytes");
        let a = scorer.score(&json!({"input": 1})).unwrap();
        let b = scorer.score(&json!({"input": 2})).unwrap();
        // Not guaranteed distinct for every pair, but these two are.
        assert_ne!(a, b);
    }

    #[test]
    fn blob_scorer_rejects_missing_input() {
        let scorer = BlobScorer::new(b"x");
        assert!(scorer.score(&json!({})).is_err());
    }
}

use crate::scorer::{BlobScorer, Scorer};
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Recognized artifact formats, keyed by file extension.
///
/// Adding a format means adding a variant and its loader here; dispatch
/// call sites never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// `.joblib` and `.pkl` dumps.
    Joblib,
    /// `.h5` Keras checkpoints.
    KerasHdf5,
    /// `.pt` and `.bin` Torch weights.
    Torch,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("joblib") | Some("pkl") => Some(ModelFormat::Joblib),
            Some("h5") => Some(ModelFormat::KerasHdf5),
            Some("pt") | Some("bin") => Some(ModelFormat::Torch),
            _ => None,
        }
    }

    /// Loads the artifact at `path` into a scorer.
    ///
    /// The blob itself is opaque; each format validates it is readable and
    /// non-empty, then wraps it in a placeholder scorer. A genuine
    /// inference backend slots in per-variant without touching callers.
    fn load(self, path: &Path) -> Result<Box<dyn Scorer>> {
        let blob = std::fs::read(path)?;
        if blob.is_empty() {
            anyhow::bail!("artifact is empty: {}", path.display());
        }
        match self {
            ModelFormat::Joblib | ModelFormat::KerasHdf5 | ModelFormat::Torch => {
                Ok(Box::new(BlobScorer::new(&blob)))
            }
        }
    }
}

/// Recursively collects every artifact path with a recognized extension
/// under `root`. No key dedup happens at this stage.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    walk(root, &mut found);
    found.sort();
    found
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, found);
        } else if ModelFormat::from_path(&path).is_some() {
            found.push(path);
        }
    }
}

/// Stems (filename, extension stripped) of every discovered artifact,
/// sorted and deduplicated. Used as the `/models` fallback when loading
/// produced an empty registry.
pub fn discovered_stems(root: &Path) -> Vec<String> {
    let mut stems: Vec<String> = discover(root)
        .iter()
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
        .collect();
    stems.sort();
    stems.dedup();
    stems
}

/// Maps model keys to loaded scorers. Populated once at startup,
/// read-only afterwards; there is no reload or invalidation path.
pub struct ModelRegistry {
    models: HashMap<String, Box<dyn Scorer>>,
}

impl ModelRegistry {
    /// Builds an empty registry (useful for tests and config-free starts).
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Discovers and loads every artifact under `root`.
    ///
    /// A loader failure excludes that artifact and loading continues; a
    /// duplicate key keeps the first-loaded entry. Total failure is not
    /// fatal: an empty registry is a valid outcome.
    pub fn load_all(root: &Path) -> Self {
        let mut models: HashMap<String, Box<dyn Scorer>> = HashMap::new();
        for path in discover(root) {
            let Some(format) = ModelFormat::from_path(&path) else {
                continue;
            };
            let Some(key) = path.file_stem().and_then(|s| s.to_str()).map(String::from) else {
                continue;
            };
            if models.contains_key(&key) {
                tracing::warn!(key = %key, path = %path.display(), "Duplicate model key, skipping");
                continue;
            }
            match format.load(&path) {
                Ok(scorer) => {
                    tracing::info!(key = %key, path = %path.display(), "Loaded model");
                    models.insert(key, scorer);
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to load model, skipping");
                }
            }
        }
        Self { models }
    }

    pub fn lookup(&self, key: &str) -> Option<&dyn Scorer> {
        self.models.get(key).map(|s| s.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.models.contains_key(key)
    }

    /// Sorted model keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.models.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

use crate::registry::{discover, discovered_stems, ModelFormat, ModelRegistry};
use std::path::Path;
use tempfile::TempDir;

fn write_artifact(dir: &Path, name: &str, bytes: &[u8]) {
    std::fs::write(dir.join(name), bytes).unwrap();
}

#[test]
fn format_from_extension() {
    assert_eq!(
        ModelFormat::from_path(Path::new("a/b/model1.joblib")),
        Some(ModelFormat::Joblib)
    );
    assert_eq!(
        ModelFormat::from_path(Path::new("net.pkl")),
        Some(ModelFormat::Joblib)
    );
    assert_eq!(
        ModelFormat::from_path(Path::new("net.h5")),
        Some(ModelFormat::KerasHdf5)
    );
    assert_eq!(
        ModelFormat::from_path(Path::new("weights.pt")),
        Some(ModelFormat::Torch)
    );
    assert_eq!(
        ModelFormat::from_path(Path::new("weights.bin")),
        Some(ModelFormat::Torch)
    );
    assert_eq!(ModelFormat::from_path(Path::new("readme.txt")), None);
    assert_eq!(ModelFormat::from_path(Path::new("noext")), None);
}

#[test]
fn discover_recurses_and_filters() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("nested/deeper")).unwrap();
    write_artifact(dir.path(), "model1.joblib", b"x");
    write_artifact(&dir.path().join("nested"), "model2.pt", b"y");
    write_artifact(&dir.path().join("nested/deeper"), "model3.h5", b"z");
    write_artifact(dir.path(), "notes.txt", b"ignored");

    let found = discover(dir.path());
    assert_eq!(found.len(), 3);
}

#[test]
fn load_all_skips_duplicates_keeping_first() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("sub")).unwrap();
    // Same stem in two places; discovery order is sorted, so the shallower
    // path (sorting first) wins deterministically.
    write_artifact(dir.path(), "model1.joblib", b"first");
    write_artifact(&dir.path().join("sub"), "model1.pt", b"second");

    let registry = ModelRegistry::load_all(dir.path());
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("model1"));
}

#[test]
fn load_all_skips_unloadable_artifacts() {
    let dir = TempDir::new().unwrap();
    write_artifact(dir.path(), "empty.joblib", b"");
    write_artifact(dir.path(), "good.joblib", b"bytes");

    let registry = ModelRegistry::load_all(dir.path());
    assert_eq!(registry.keys(), vec!["good".to_string()]);
}

#[test]
fn load_all_is_deterministic_across_runs() {
    let dir = TempDir::new().unwrap();
    write_artifact(dir.path(), "b.joblib", b"b");
    write_artifact(dir.path(), "a.pt", b"a");
    write_artifact(dir.path(), "c.h5", b"c");

    let first = ModelRegistry::load_all(dir.path()).keys();
    let second = ModelRegistry::load_all(dir.path()).keys();
    assert_eq!(first, second);
    assert_eq!(first, vec!["a", "b", "c"]);
}

#[test]
fn discovered_stems_sorted_and_deduped() {
    let dir = TempDir::new().unwrap();
    write_artifact(dir.path(), "m2.joblib", b"x");
    write_artifact(dir.path(), "m1.pt", b"y");
    write_artifact(dir.path(), "m1.h5", b"z");

    assert_eq!(discovered_stems(dir.path()), vec!["m1", "m2"]);
}

#[test]
fn empty_root_yields_empty_registry() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::load_all(dir.path());
    assert!(registry.is_empty());
    assert!(registry.lookup("anything").is_none());
}

//! Tests for rating unit discovery.

use std::fs;
use std::path::{Path, PathBuf};

use ttime_config::{ConfigError, RatingsConfig};

use crate::builtin::{FreeDays, Gaps};
use crate::error::LoadError;
use crate::loader::{PluginLoader, RatingModule, UnitManifest};
use crate::registry::RatingRegistry;
use crate::test_utils::{capture_messages, FixedGaps, Overlaps};

fn write_unit(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, contents).unwrap();
    path
}

fn loader_for(dirs: &[&Path]) -> PluginLoader {
    PluginLoader::new(RatingsConfig::with_dirs(dirs.iter().map(|d| d.to_path_buf())))
}

fn register_overlaps(registry: &mut RatingRegistry) -> Result<usize, ConfigError> {
    registry.register::<Overlaps>().map(usize::from)
}

fn register_fixed_gaps(registry: &mut RatingRegistry) -> Result<usize, ConfigError> {
    registry.register::<FixedGaps>().map(usize::from)
}

#[test]
fn test_manifest_parsing() {
    let manifest = UnitManifest::from_toml_str(
        r#"
        module = "gaps"
        description = "Penalize idle time"
    "#,
    )
    .unwrap();
    assert_eq!(manifest.module, "gaps");
    assert_eq!(manifest.description.as_deref(), Some("Penalize idle time"));
}

#[test]
fn test_manifest_rejects_unknown_fields() {
    assert!(UnitManifest::from_toml_str("module = \"gaps\"\nweight = 3").is_err());
}

#[test]
fn test_discover_registers_units() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "gaps.toml", "module = \"gaps\"");
    write_unit(dir.path(), "free_days.toml", "module = \"free_days\"");
    write_unit(dir.path(), "README.md", "not a unit");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]);

    assert_eq!(loader.discover_in(&[dir.path().to_path_buf()], &mut registry).unwrap(), 2);
    assert!(registry.contains::<Gaps>());
    assert!(registry.contains::<FreeDays>());
    assert!(loader.is_loaded("gaps.toml"));
    assert!(!loader.is_loaded("README.md"));
}

#[test]
fn test_missing_directories_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "gaps.toml", "module = \"gaps\"");
    let missing = dir.path().join("does-not-exist");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[missing.as_path(), dir.path()]);

    let count = loader
        .discover_in(&[missing, dir.path().to_path_buf()], &mut registry)
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_discover_uses_configured_dirs() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "gaps.toml", "module = \"gaps\"");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]);

    assert_eq!(loader.discover(&mut registry).unwrap(), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_same_unit_name_in_two_dirs_loads_once() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_unit(first.path(), "gaps.toml", "module = \"gaps\"");
    // the shadowed copy would fail if it were ever read
    write_unit(second.path(), "gaps.toml", "this is not toml");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[first.path(), second.path()]);

    assert_eq!(loader.discover(&mut registry).unwrap(), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_discovery_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "gaps.toml", "module = \"gaps\"");
    write_unit(dir.path(), "free_days.toml", "module = \"free_days\"");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]);

    assert_eq!(loader.discover(&mut registry).unwrap(), 2);
    assert_eq!(loader.discover(&mut registry).unwrap(), 0);
    assert_eq!(registry.len(), 2);
    assert_eq!(loader.loaded_units().count(), 2);
}

#[test]
fn test_two_units_for_one_module_register_once() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "gaps.toml", "module = \"gaps\"");
    write_unit(dir.path(), "more_gaps.toml", "module = \"gaps\"");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]);

    assert_eq!(loader.discover(&mut registry).unwrap(), 2);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_malformed_unit_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "broken.toml", "module = ");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]);

    let err = loader.discover(&mut registry).unwrap_err();
    assert!(matches!(err, LoadError::Manifest { .. }));
    assert!(!loader.is_loaded("broken.toml"));
}

#[test]
fn test_unknown_module_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "teleport.toml", "module = \"teleport\"");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]);

    match loader.discover(&mut registry).unwrap_err() {
        LoadError::UnknownModule { unit, module } => {
            assert_eq!(unit, "teleport.toml");
            assert_eq!(module, "teleport");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_unit_accepts_indirect_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_unit(dir.path(), "gaps.toml", "module = \"gaps\"");

    let mut registry = RatingRegistry::new();
    let mut loader = PluginLoader::default();

    // a path with a `..` component still identifies the same file
    let indirect = dir.path().join("..").join(dir.path().file_name().unwrap()).join("gaps.toml");
    assert!(loader.load_unit(&indirect, &mut registry).unwrap());
    assert!(!loader.load_unit(&path, &mut registry).unwrap());
}

#[test]
fn test_load_module_and_unit_share_duplicate_suppression() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "gaps.toml", "module = \"gaps\"");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]);

    assert!(loader.load_module("gaps", &mut registry).unwrap());
    assert!(!loader.load_module("gaps", &mut registry).unwrap());
    // the unit registers an already known type
    assert_eq!(loader.discover(&mut registry).unwrap(), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_load_all_modules() {
    let mut registry = RatingRegistry::new();
    let mut loader = PluginLoader::default();

    assert_eq!(loader.load_all_modules(&mut registry).unwrap(), 2);
    assert_eq!(loader.load_all_modules(&mut registry).unwrap(), 0);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_custom_module_is_available_to_units() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "overlaps.toml", "module = \"overlaps\"");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]).with_module(RatingModule {
        name: "overlaps",
        register: register_overlaps,
    });

    assert_eq!(loader.discover(&mut registry).unwrap(), 1);
    assert!(registry.find("Overlaps").is_some());
    assert_eq!(loader.modules().len(), 3);
}

#[test]
fn test_registration_failure_is_fatal() {
    let mut registry = RatingRegistry::new();
    let mut loader = PluginLoader::default().with_module(RatingModule {
        name: "fixed_gaps",
        register: register_fixed_gaps,
    });

    loader.load_module("gaps", &mut registry).unwrap();
    let err = loader.load_module("fixed_gaps", &mut registry).unwrap_err();
    assert!(matches!(err, LoadError::Registration { .. }));
    assert!(!loader.is_loaded("fixed_gaps"));
}

fn loading_lines(messages: &[String]) -> usize {
    messages.iter().filter(|m| *m == "Loading rating").count()
}

#[test]
fn test_loaded_units_are_logged_once_each() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "gaps.toml", "module = \"gaps\"");
    write_unit(dir.path(), "free_days.toml", "module = \"free_days\"");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]);

    let (count, messages) = capture_messages(|| loader.discover(&mut registry).unwrap());
    assert_eq!(count, 2);
    assert_eq!(loading_lines(&messages), 2);
}

#[test]
fn test_failed_registration_is_not_logged_as_loaded() {
    let dir = tempfile::tempdir().unwrap();
    write_unit(dir.path(), "fixed_gaps.toml", "module = \"fixed_gaps\"");

    let mut registry = RatingRegistry::new();
    let mut loader = loader_for(&[dir.path()]).with_module(RatingModule {
        name: "fixed_gaps",
        register: register_fixed_gaps,
    });

    let (results, messages) = capture_messages(|| {
        let module = loader.load_module("gaps", &mut registry);
        let units = loader.discover(&mut registry);
        (module, units)
    });

    assert!(results.0.unwrap());
    assert!(matches!(results.1, Err(LoadError::Registration { .. })));
    assert_eq!(loading_lines(&messages), 1);
    assert!(!loader.is_loaded("fixed_gaps.toml"));
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Engine wiring: configuration on disk, reference files on disk, atomic reload.

use std::fs;
use std::path::Path;

use ontomap::prelude::*;
use ontomap::structures::templates::load_motor_cortex_reference;
use tempfile::TempDir;

fn write_reference(dir: &Path, name: &str, version: &str) -> std::path::PathBuf {
    let mut tables = load_motor_cortex_reference().unwrap();
    tables.version = version.to_string();
    let path = dir.join(name);
    fs::write(&path, tables.to_json_string().unwrap()).unwrap();
    path
}

fn write_config(dir: &Path, reference: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("ontomap_configuration.toml");
    let content = format!(
        "[reference]\npath = \"{}\"\n\n[remap]\nconflict_tolerance = 0.001\n{}\n",
        reference.display(),
        extra
    );
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_engine_from_config_file() {
    let dir = TempDir::new().unwrap();
    let reference = write_reference(dir.path(), "reference.json", "disk-v1");
    let config_path = write_config(dir.path(), &reference, "record_conflicts = false");

    let config = load_config(Some(&config_path), None).unwrap();
    let engine = RemapEngine::from_config(&config).unwrap();

    assert_eq!(engine.atlas().store().version(), "disk-v1");
    assert_eq!(engine.reference_path(), Some(reference.as_path()));
    assert_eq!(engine.options().conflict_tolerance, 0.001);
    assert!(!engine.options().record_conflicts);

    let output = engine
        .remap(&["MOp1".into()], &[1.0], Some(Hemisphere::Right))
        .unwrap();
    assert_eq!(
        output.mapping("beryl").unwrap().filtered[&RegionKey::new("MOp", Hemisphere::Right)],
        1.0
    );
}

#[test]
fn test_reload_picks_up_rewritten_reference() {
    let dir = TempDir::new().unwrap();
    let reference = write_reference(dir.path(), "reference.json", "disk-v1");
    let config_path = write_config(dir.path(), &reference, "");
    let engine = RemapEngine::from_config(&load_config(Some(&config_path), None).unwrap()).unwrap();

    let held = engine.atlas();
    write_reference(dir.path(), "reference.json", "disk-v2");
    let previous = engine.reload().unwrap();

    assert_eq!(previous.store().version(), "disk-v1");
    assert_eq!(held.store().version(), "disk-v1");
    assert_eq!(engine.atlas().store().version(), "disk-v2");
}

#[test]
fn test_failed_reload_keeps_current_atlas() {
    let dir = TempDir::new().unwrap();
    let reference = write_reference(dir.path(), "reference.json", "disk-v1");
    let config_path = write_config(dir.path(), &reference, "");
    let engine = RemapEngine::from_config(&load_config(Some(&config_path), None).unwrap()).unwrap();

    fs::write(&reference, "{ not json").unwrap();
    assert!(matches!(
        engine.reload(),
        Err(EngineError::Ontology(OntologyError::Parse(_)))
    ));
    assert_eq!(engine.atlas().store().version(), "disk-v1");
}

#[test]
fn test_reload_from_rejects_broken_tree() {
    let dir = TempDir::new().unwrap();
    let mut tables = load_motor_cortex_reference().unwrap();
    tables.nodes[1].parent = Some("nowhere".to_string());
    let broken = dir.path().join("broken.json");
    fs::write(&broken, tables.to_json_string().unwrap()).unwrap();

    let engine = RemapEngine::from_config(&OntomapConfig::default()).unwrap();
    assert!(matches!(
        engine.reload_from(&broken),
        Err(EngineError::Ontology(OntologyError::DataIntegrity(_)))
    ));

    let good = write_reference(dir.path(), "good.json", "disk-v3");
    engine.reload_from(&good).unwrap();
    assert_eq!(engine.atlas().store().version(), "disk-v3");
    assert!(engine.reference_path().is_none());
}

#[test]
fn test_feature_record_serializes_for_storage() {
    let engine = RemapEngine::from_config(&OntomapConfig::default()).unwrap();
    let record = engine
        .feature_record(
            &[RegionIdentity::Id(-985), RegionIdentity::Id(767)],
            &[2.0, 3.0],
            None,
        )
        .unwrap();

    let json = record.to_json_string().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], "motor-cortex-2017");
    assert_eq!(value["mappings"]["beryl"]["index"], serde_json::json!([-985, 993]));
    assert_eq!(value["mappings"]["beryl"]["values"], serde_json::json!([2.0, 3.0]));
    assert_eq!(value["mappings"]["cosmos"]["index"], serde_json::json!([-315, 315]));
}

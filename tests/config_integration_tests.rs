//! Integration tests for the configuration store: persistence format,
//! naming-convention migration, and preset lifecycle.

use camino::Utf8PathBuf;
use fmtbatch::models::{preset, BraceStyle, RawStyleConfig, SpacePolicy};
use fmtbatch::{ConfigStore, StyleConfig};
use std::fs;
use tempfile::TempDir;

fn utf8_dir(temp_dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
}

#[test]
fn persisted_file_is_pretty_printed_internal_convention() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = utf8_dir(&temp_dir);

    let mut store = ConfigStore::open(&config_dir).unwrap();
    store.save(preset("WebKit")).unwrap();

    let on_disk = fs::read_to_string(store.config_path()).unwrap();
    // 2-space pretty printing, internal keys only
    assert!(on_disk.contains("{\n  \"baseFormat\": \"WebKit\""));
    assert!(on_disk.contains("\"columnLimit\": 100"));
    assert!(!on_disk.contains("ColumnLimit"));
}

#[test]
fn external_convention_file_is_migrated_on_save() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = utf8_dir(&temp_dir);
    fs::write(
        config_dir.join("config.json"),
        r#"{"IndentWidth": 3, "SpacesInParens": "Always", "BreakBeforeBraces": "Linux"}"#,
    )
    .unwrap();

    let mut store = ConfigStore::open(&config_dir).unwrap();
    assert_eq!(store.current().indent_width, 3);
    assert_eq!(store.current().spaces_in_parentheses, SpacePolicy::Always);
    assert_eq!(store.current().break_before_braces, BraceStyle::Linux);

    // Re-saving writes the internal convention
    let current = store.current().clone();
    store.save(current).unwrap();
    let on_disk = fs::read_to_string(store.config_path()).unwrap();
    assert!(on_disk.contains("\"indentWidth\": 3"));
    assert!(!on_disk.contains("IndentWidth"));
}

#[test]
fn legacy_boolean_policies_load_losslessly() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = utf8_dir(&temp_dir);
    fs::write(
        config_dir.join("config.json"),
        r#"{"spacesInParentheses": true, "spacesInAngles": false, "indentWidth": 2}"#,
    )
    .unwrap();

    let store = ConfigStore::open(&config_dir).unwrap();
    assert_eq!(store.current().spaces_in_parentheses, SpacePolicy::Always);
    assert_eq!(store.current().spaces_in_angles, SpacePolicy::Never);
}

#[test]
fn preset_sequence_always_replaces_wholesale() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = utf8_dir(&temp_dir);
    let mut store = ConfigStore::open(&config_dir).unwrap();

    for name in ["GNU", "WebKit", "LLVM", "Stroustrup"] {
        let applied = store.apply_preset(name).unwrap();
        assert_eq!(&applied, store.current());
        assert_eq!(applied, preset(name));
    }

    // The last preset is what a fresh store sees
    let reopened = ConfigStore::open(&config_dir).unwrap();
    assert_eq!(reopened.current(), &preset("Stroustrup"));
}

#[test]
fn every_builtin_preset_round_trips_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = utf8_dir(&temp_dir);
    let mut store = ConfigStore::open(&config_dir).unwrap();

    for name in ConfigStore::preset_names() {
        store.apply_preset(name).unwrap();
        let on_disk = fs::read_to_string(store.config_path()).unwrap();
        let raw: RawStyleConfig = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(raw.normalize(), preset(name), "preset {name} did not round-trip");
    }
}

#[test]
fn empty_config_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = utf8_dir(&temp_dir);
    fs::write(config_dir.join("config.json"), "").unwrap();

    let store = ConfigStore::open(&config_dir).unwrap();
    assert_eq!(store.current(), &StyleConfig::default());
}

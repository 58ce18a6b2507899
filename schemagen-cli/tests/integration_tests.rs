//! Integration tests for schemagen-cli.
//!
//! These tests run the whole pipeline (config, scanning, building,
//! rendering, writing and checking) against on-disk projects.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use schemagen::SchemaError;
use schemagen_cli::{
    config::{CliArgs, ConfigManager},
    error::CliError,
    generator::{CodeGenerator, Selection},
    scanner::SourceScanner,
    writer::{self, FileStatus, FileWriter},
};

/// Get the path to the fixture project.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// Copy the fixture project into a temporary directory.
fn fixture_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    copy_dir(&fixtures_path(), dir.path());
    dir
}

/// Create a temporary directory with test files.
fn create_temp_project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn generator_for(root: &Path) -> CodeGenerator {
    let config = ConfigManager::load(root, None).unwrap();
    CodeGenerator::new(root, config)
}

fn generate_and_write(root: &Path) {
    let generator = generator_for(root);
    let output = generator.generate(Selection::All).unwrap();
    FileWriter::new(false)
        .write_all(generator.resolve(&output))
        .unwrap();
}

// =============================================================================
// Scanner Integration Tests
// =============================================================================

#[test]
fn test_scanner_finds_fixture_components() {
    let scanner = SourceScanner::new(fixtures_path().join("gen/comp"));
    let files = scanner.scan().unwrap();

    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["door", "light", "power", "sensor_comparator"]);
}

// =============================================================================
// Model Integration Tests
// =============================================================================

#[test]
fn test_fixture_model() {
    let set = generator_for(&fixtures_path()).build(Selection::All).unwrap();

    assert_eq!(set.wire_id_count, 5);

    let door = set.component("door").unwrap();
    assert_eq!(door.display_name, "Door");
    assert_eq!(door.dependencies, vec!["power"]);

    // body fields chain from the entity pointer
    let preds: Vec<_> = door.body_fields.iter().map(|f| f.predecessor.as_str()).collect();
    assert_eq!(preds, vec!["entity", "mesh", "pos", "desired_state", "filter"]);

    // both filters link to the one stub and get their own wire ids
    assert_eq!(door.body_fields[3].linked_stub, Some(1));
    assert_eq!(door.body_fields[4].linked_stub, Some(1));
    let ids: Vec<_> = door.wire_fields().filter_map(|f| f.wire_id).map(|id| id.0).collect();
    assert_eq!(ids, vec![0, 1]);

    let light = set.component("light").unwrap();
    assert_eq!(light.body_fields[2].wire_id.map(|id| id.0), Some(2));

    let sensor = set.component("sensor_comparator").unwrap();
    assert_eq!(sensor.dependencies, vec!["light", "power"]);
    let ids: Vec<_> = sensor.wire_fields().filter_map(|f| f.wire_id).map(|id| id.0).collect();
    assert_eq!(ids, vec![3, 4]);
    assert_eq!(sensor.body_fields[0].linked_stub, None);

    let msg = set.enum_spec("msg_type").unwrap();
    assert_eq!(msg.value_of("pong"), Some(1));
    assert_eq!(msg.value_of("leave"), Some(11));
    assert_eq!(msg.description_of(1), Some("msg_type"));
    assert_eq!(msg.description_of(10), Some("Player joined"));
}

#[test]
fn test_duplicate_field_rejected_without_config() {
    let dir = fixture_project();
    fs::remove_file(dir.path().join("schemagen.toml")).unwrap();

    let err = generator_for(dir.path())
        .build(Selection::Components)
        .unwrap_err();

    assert!(matches!(
        err,
        CliError::Schema(SchemaError::DuplicateBodyField { ref file, ref field, .. })
            if file == "door" && field == "filter"
    ));
}

// =============================================================================
// Generate / Check Integration Tests
// =============================================================================

#[test]
fn test_generate_writes_all_outputs() {
    let dir = fixture_project();
    generate_and_write(dir.path());

    let component_dir = dir.path().join("src/component");
    for name in [
        "component_managers.h",
        "component_ui_genned.cc",
        "door_component.h",
        "door_component.cc",
        "sensor_comparator_component.h",
        "sensor_comparator_component.cc",
    ] {
        assert!(component_dir.join(name).is_file(), "missing {}", name);
    }

    let enums_h = fs::read_to_string(dir.path().join("src/enums/enums.h")).unwrap();
    assert!(enums_h.contains("enum class msg_type"));
    assert!(enums_h.contains("    chat = 20,"));

    let door_cc = fs::read_to_string(component_dir.join("door_component.cc")).unwrap();
    assert!(door_cc.contains("load_value_from_config<std::string>(config, \"mesh\")"));

    let ui = fs::read_to_string(component_dir.join("component_ui_genned.cc")).unwrap();
    assert!(ui.contains("\"Sensor Comparator/input_b\");"));
    assert!(ui.contains("    case 4: {"));
}

#[test]
fn test_generation_is_idempotent() {
    let dir = fixture_project();
    let generator = generator_for(dir.path());

    let first = generator.generate(Selection::All).unwrap();
    let second = generator.generate(Selection::All).unwrap();

    assert_eq!(first.set, second.set);
    assert_eq!(first.files, second.files);
}

#[test]
fn test_check_detects_stale_and_missing() {
    let dir = fixture_project();
    let generator = generator_for(dir.path());
    let output = generator.generate(Selection::All).unwrap();

    // Nothing written yet
    assert!(generator
        .resolve(&output)
        .iter()
        .all(|(path, content)| writer::compare(path, content).unwrap() == FileStatus::Missing));

    FileWriter::new(false)
        .write_all(generator.resolve(&output))
        .unwrap();
    assert!(generator
        .resolve(&output)
        .iter()
        .all(|(path, content)| writer::compare(path, content).unwrap() == FileStatus::UpToDate));

    // A definition change makes the outputs stale
    fs::write(
        dir.path().join("gen/enum/window_mode"),
        "windowed\nfullscreen\nborderless\nexclusive\n",
    )
    .unwrap();
    let output = generator.generate(Selection::All).unwrap();
    let enums_h = dir.path().join("src/enums/enums.h");
    let (_, content) = generator
        .resolve(&output)
        .into_iter()
        .find(|(path, _)| *path == enums_h)
        .unwrap();
    assert_eq!(writer::compare(&enums_h, content).unwrap(), FileStatus::Stale);
}

#[test]
fn test_failed_build_writes_nothing() {
    let dir = fixture_project();
    fs::write(dir.path().join("gen/enum/colors"), "Red\nGreen = 0\n").unwrap();

    let generator = generator_for(dir.path());
    let err = generator.generate(Selection::All).unwrap_err();

    assert!(matches!(
        err,
        CliError::Schema(SchemaError::NonMonotonic { expected: 1, found: 0, .. })
    ));
    assert!(!dir.path().join("src").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = fixture_project();
    let generator = generator_for(dir.path());
    let output = generator.generate(Selection::All).unwrap();

    let results = FileWriter::new(true)
        .write_all(generator.resolve(&output))
        .unwrap();

    assert_eq!(results.len(), output.files.len());
    assert!(!dir.path().join("src").exists());
}

#[test]
fn test_only_enums() {
    let dir = create_temp_project(&[("gen/enum/mode", "off\non\n")]);
    let generator = generator_for(dir.path());

    let output = generator.generate(Selection::Enums).unwrap();

    assert_eq!(output.files.len(), 2);
    assert!(generator
        .resolve(&output)
        .iter()
        .all(|(path, _)| path.starts_with(dir.path().join("src/enums"))));
}

// =============================================================================
// Config Integration Tests
// =============================================================================

#[test]
fn test_config_relocates_directories() {
    let dir = create_temp_project(&[
        (
            "schemagen.toml",
            "[input]\ncomponent_dir = \"defs/c\"\nenum_dir = \"defs/e\"\n\n\
             [output]\ncomponent_dir = \"out/c\"\nenum_dir = \"out/e\"\n\n\
             [components]\ndelimiter = \";\"\nwire_filter_type = \"wire_t\"\n",
        ),
        ("defs/c/relay", "ui_name;Relay\nbody;wire_t;input;{}\n"),
        ("defs/e/mode", "a\n"),
    ]);

    generate_and_write(dir.path());

    let relay = fs::read_to_string(dir.path().join("out/c/relay_component.h")).unwrap();
    assert!(relay.contains("relay"));
    assert!(dir.path().join("out/e/enums.cc").is_file());

    let set = generator_for(dir.path()).build(Selection::All).unwrap();
    assert_eq!(set.wire_id_count, 1);
}

#[test]
fn test_strict_override_rejects_unknown_lines() {
    let dir = create_temp_project(&[
        ("gen/comp/lamp", "ui_name,Lamp\nbodyy,float,x,0\n"),
        ("gen/enum/mode", "a\n"),
    ]);

    // default: warn and skip
    assert!(generator_for(dir.path()).build(Selection::All).is_ok());

    let config = ConfigManager::merge_cli_args(
        ConfigManager::load(dir.path(), None).unwrap(),
        &CliArgs {
            strict: true,
            ..Default::default()
        },
    );
    let err = CodeGenerator::new(dir.path(), config)
        .build(Selection::All)
        .unwrap_err();

    assert!(matches!(
        err,
        CliError::Schema(SchemaError::UnknownLineKind { line_number: 2, .. })
    ));
}

#[test]
fn test_init_content_round_trips() {
    let dir = create_temp_project(&[("schemagen.toml", ConfigManager::default_config_content())]);

    let config = ConfigManager::load(dir.path(), None).unwrap();

    assert_eq!(config.input.component_dir, PathBuf::from("gen/comp"));
    assert_eq!(config.output.enum_dir, PathBuf::from("src/enums"));
    assert!(config.build_options().is_ok());
}

#[test]
fn test_invalid_delimiter_rejected() {
    let dir = create_temp_project(&[
        ("schemagen.toml", "[components]\ndelimiter = \"::\"\n"),
        ("gen/comp/a", "ui_name,A\n"),
        ("gen/enum/b", "x\n"),
    ]);

    let err = generator_for(dir.path()).build(Selection::All).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

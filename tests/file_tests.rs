//! Integration tests for file I/O operations.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use pathquill::config::{Config, OutputFormat};
use pathquill::file::loader::{load_document, parse_document};
use pathquill::file::saver::save_document;
use serde_json::json;
use std::fs;
use std::io::{Read, Write};
use tempfile::{Builder, TempDir};

#[test]
fn test_load_yaml_file() {
    let mut temp_file = Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        temp_file,
        "user:\n  name: Alice\n  age: 30\nitems:\n  - 1\n  - 2\nmetadata: null\n"
    )
    .unwrap();

    let document = load_document(temp_file.path()).unwrap();
    assert_eq!(
        document,
        json!({
            "user": {"name": "Alice", "age": 30},
            "items": [1, 2],
            "metadata": null
        })
    );
}

#[test]
fn test_load_json_file_keeps_key_order() {
    let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(temp_file, r#"{{"zeta": 1, "alpha": 2, "mid": 3}}"#).unwrap();

    let document = load_document(temp_file.path()).unwrap();
    let keys: Vec<&String> = document.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_load_gzipped_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(br#"{"a": {"b": [1, 2]}}"#).unwrap();
    encoder.finish().unwrap();

    let document = load_document(&path).unwrap();
    assert_eq!(
        pathquill::get_in(&document, "a.b.1").unwrap().unwrap().into_owned(),
        json!(2)
    );
}

#[test]
fn test_load_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(load_document(dir.path().join("missing.yaml")).is_err());
}

#[test]
fn test_load_invalid_json_fails() {
    let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(temp_file, "{{not json").unwrap();
    assert!(load_document(temp_file.path()).is_err());
}

#[test]
fn test_parse_document_detects_format() {
    assert_eq!(parse_document(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
    assert_eq!(parse_document("a:\n  - x\n").unwrap(), json!({"a": ["x"]}));
}

#[test]
fn test_save_yaml_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.yaml");
    let document = json!({"a": {"b": [1, "two"]}});

    save_document(&path, &document, &Config::default()).unwrap();
    assert_eq!(load_document(&path).unwrap(), document);
    assert!(!dir.path().join("out.tmp").exists());
}

#[test]
fn test_save_json_follows_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.json");

    save_document(&path, &json!({"a": 1}), &Config::default()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"a\": 1\n}\n");
}

#[test]
fn test_save_unknown_extension_uses_config_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.txt");
    let config = Config {
        output_format: OutputFormat::Json,
        pretty: false,
        ..Config::default()
    };

    save_document(&path, &json!({"a": [1]}), &config).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":[1]}\n");
}

#[test]
fn test_save_creates_backup() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.yaml");
    fs::write(&path, "old: true\n").unwrap();
    let config = Config {
        create_backup: true,
        ..Config::default()
    };

    save_document(&path, &json!({"new": true}), &config).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("doc.yaml.bak")).unwrap(),
        "old: true\n"
    );
    assert_eq!(load_document(&path).unwrap(), json!({"new": true}));
}

#[test]
fn test_save_gzipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.json.gz");
    let document = json!({"k": "v"});

    save_document(&path, &document, &Config::default()).unwrap();

    let mut decoder = GzDecoder::new(fs::File::open(&path).unwrap());
    let mut content = String::new();
    decoder.read_to_string(&mut content).unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&content).unwrap(), document);
    assert_eq!(load_document(&path).unwrap(), document);
}

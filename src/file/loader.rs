//! Document loading functionality.
//!
//! This module provides functions to load YAML or JSON documents from files
//! or stdin into `serde_json::Value` trees that path patterns can address.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Loads and parses a YAML or JSON file from the filesystem.
///
/// Files ending in `.json` (optionally followed by `.gz`) are parsed as
/// JSON; everything else is parsed as YAML, which also accepts JSON input.
/// Gzipped files are decompressed transparently.
///
/// # Examples
///
/// ```no_run
/// use pathquill::file::loader::load_document;
///
/// let document = load_document("config.yaml").unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist
/// - The file cannot be read (permissions, etc.)
/// - The file is gzipped but corrupted
/// - The file contents are not valid YAML/JSON
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path_ref = path.as_ref();

    // Check if file is gzipped
    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    // Read content (decompress if needed)
    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref).context("Failed to read file")?
    };

    log::debug!("Loaded {} bytes from {}", content.len(), path_ref.display());

    if is_json_path(path_ref) {
        serde_json::from_str(&content).context("Failed to parse JSON")
    } else {
        serde_yaml::from_str(&content).context("Failed to parse YAML")
    }
}

/// Loads and parses a document from standard input.
///
/// Gzip input is detected by its magic bytes. JSON is tried first, then YAML.
///
/// # Errors
///
/// This function will return an error if:
/// - Reading from stdin fails
/// - The input contents are neither valid JSON nor valid YAML
pub fn load_document_from_stdin() -> Result<Value> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    // Check for gzip magic bytes (0x1f 0x8b)
    let content = if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")?
    };

    parse_document(&content)
}

/// Parses document text of unknown format, trying JSON before YAML.
pub fn parse_document(content: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str(content) {
        return Ok(value);
    }

    serde_yaml::from_str(content)
        .context("Failed to parse input: content is neither valid JSON nor valid YAML")
}

/// Determines if a file holds JSON based on its name.
///
/// Handles the .gz suffix:
/// - `data.json` → true
/// - `data.json.gz` → true
/// - `data.yaml.gz` → false
fn is_json_path<P: AsRef<Path>>(path: P) -> bool {
    let path_str = path.as_ref().to_string_lossy();

    // Remove .gz suffix if present
    let base = if let Some(stripped) = path_str.strip_suffix(".gz") {
        stripped
    } else {
        &path_str
    };

    base.ends_with(".json")
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped stdin")?;
    Ok(content)
}

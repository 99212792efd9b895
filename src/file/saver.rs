//! Document saving functionality.
//!
//! This module renders `serde_json::Value` documents as YAML or JSON and
//! writes them to files with atomic write operations and optional backup
//! creation.

use crate::config::{Config, OutputFormat};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Saves a document to a file with optional backup creation.
///
/// The format follows the file name (`.json`, `.yaml`, `.yml`, each with an
/// optional `.gz` suffix that turns on gzip compression) and falls back to
/// `config.output_format`. The write is atomic: data goes to a temp file
/// that is then renamed over the target.
///
/// # Examples
///
/// ```no_run
/// use pathquill::config::Config;
/// use pathquill::file::saver::save_document;
/// use serde_json::json;
///
/// save_document("output.yaml", &json!({"a": 1}), &Config::default()).unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - Backup creation fails (if requested)
/// - Serialization fails
/// - Writing to the temp file fails
/// - Renaming the temp file to the target fails
pub fn save_document<P: AsRef<Path>>(path: P, value: &Value, config: &Config) -> Result<()> {
    let path = path.as_ref();

    // Determine if we should compress based on target filename
    let should_compress = path.to_string_lossy().ends_with(".gz");

    // Create backup if requested and file exists
    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let format = format_for_path(path).unwrap_or(config.output_format);
    let rendered = render_document(value, format, config)?;

    write_file_atomic(path, rendered.as_bytes(), should_compress)?;
    log::debug!("Saved {} as {} to {}", rendered.len(), format, path.display());

    Ok(())
}

/// Renders a document in the requested format, ending with a newline.
pub fn render_document(value: &Value, format: OutputFormat, config: &Config) -> Result<String> {
    let mut rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to serialize YAML")?,
        OutputFormat::Json if config.pretty => {
            let indent = vec![b' '; config.indent_size];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut serializer = serde_json::Serializer::with_formatter(Vec::new(), formatter);
            value
                .serialize(&mut serializer)
                .context("Failed to serialize JSON")?;
            String::from_utf8(serializer.into_inner()).context("Generated invalid UTF-8")?
        }
        OutputFormat::Json => serde_json::to_string(value).context("Failed to serialize JSON")?,
    };

    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Format implied by a file name, looking through a `.gz` suffix.
fn format_for_path(path: &Path) -> Option<OutputFormat> {
    let path_str = path.to_string_lossy();
    let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

    if base.ends_with(".json") {
        Some(OutputFormat::Json)
    } else if base.ends_with(".yaml") || base.ends_with(".yml") {
        Some(OutputFormat::Yaml)
    } else {
        None
    }
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Writes data to a file atomically, optionally compressing with gzip.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    // Atomic rename
    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}

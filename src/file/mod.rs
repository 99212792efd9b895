//! File I/O operations for YAML and JSON documents.
//!
//! This module provides functionality to load documents from disk or stdin,
//! and save them back to files with atomic write operations and optional backups.

pub mod loader;
pub mod saver;

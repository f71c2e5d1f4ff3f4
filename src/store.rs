//! Document storage.
//!
//! The OKR and project documents are plain JSON files, edited by hand
//! and rewritten by the sync commands. Loads fail hard (a missing or
//! unparsable document is a fatal local-state error); saves serialize
//! the whole document and replace the file atomically so readers never
//! observe a partial write.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Load a JSON document from disk.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse document: {}", path.display()))
}

/// Serialize a document as pretty JSON and atomically replace `path`.
///
/// Non-ASCII text is written verbatim (serde_json does not escape it),
/// matching the hand-edited files.
pub fn save_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(document).context("Failed to serialize document")?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new_in("."),
    }
    .context("Failed to create temporary file")?;

    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.write_all(b"\n"))
        .context("Failed to write document")?;

    tmp.persist(path)
        .with_context(|| format!("Failed to replace document: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_document;
    use crate::models::OkrDocument;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("okr-2026.json");

        let doc = sample_document();
        save_document(&path, &doc).unwrap();

        let loaded: OkrDocument = load_document(&path).unwrap();
        assert_eq!(loaded, doc);

        // On-disk bytes keep the non-ASCII title readable.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("开源贡献 Open Source"));
        assert!(raw.ends_with('\n'));
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let result: Result<OkrDocument> = load_document(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result: Result<OkrDocument> = load_document(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("okr.json");

        let mut doc = sample_document();
        save_document(&path, &doc).unwrap();

        doc.last_update = "2026-06-01".to_string();
        save_document(&path, &doc).unwrap();

        let loaded: OkrDocument = load_document(&path).unwrap();
        assert_eq!(loaded.last_update, "2026-06-01");
    }
}

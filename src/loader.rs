//! Reads a format's folder of match documents into memory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::document::{MatchDocument, parse_document};
use crate::format::MatchFormat;

/// Folder holding the documents of `format` under `data_dir`.
pub fn format_dir(data_dir: &Path, format: MatchFormat) -> PathBuf {
    data_dir.join(format.as_str())
}

/// Loads every `*.json` document for `format`, in file-name order.
///
/// A missing folder yields an empty collection. Each document is tagged with
/// its file stem, which cricsheet uses as the match id.
///
/// # Errors
///
/// Fails on the first file that cannot be read or decoded.
#[tracing::instrument(skip_all, fields(format = %format))]
pub fn load_documents(data_dir: &Path, format: MatchFormat) -> Result<Vec<MatchDocument>> {
    let folder = format_dir(data_dir, format);
    if !folder.is_dir() {
        warn!(folder = %folder.display(), "No folder found for format");
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(&folder)
        .with_context(|| format!("failed to list {}", folder.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(load_document(&path)?);
    }

    info!(documents = documents.len(), "Loaded match documents");
    Ok(documents)
}

fn load_document(path: &Path) -> Result<MatchDocument> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document =
        parse_document(&bytes).with_context(|| format!("failed to decode {}", path.display()))?;

    let match_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    debug!(match_id, "Decoded match document");

    Ok(document.with_match_id(match_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_missing_folder_is_empty() {
        let tmp = TempDir::new().unwrap();
        let docs = load_documents(tmp.path(), MatchFormat::Odi).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_loads_json_only_in_name_order() {
        let tmp = TempDir::new().unwrap();
        let folder = format_dir(tmp.path(), MatchFormat::T20);
        fs::create_dir_all(&folder).unwrap();

        write(&folder, "222.json", r#"{"info": {"venue": "B"}}"#);
        write(&folder, "111.json", r#"{"info": {"venue": "A"}}"#);
        write(&folder, "README.txt", "not a match");

        let docs = load_documents(tmp.path(), MatchFormat::T20).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].match_id.as_deref(), Some("111"));
        assert_eq!(docs[0].info.venue.as_deref(), Some("A"));
        assert_eq!(docs[1].match_id.as_deref(), Some("222"));
    }

    #[test]
    fn test_malformed_document_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let folder = format_dir(tmp.path(), MatchFormat::Test);
        fs::create_dir_all(&folder).unwrap();
        write(&folder, "broken.json", "{");

        let err = load_documents(tmp.path(), MatchFormat::Test).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}

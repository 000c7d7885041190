//! Bibliography fingerprints.
//!
//! A fingerprint is everything that can change the rendered bibliography:
//! the bibliography metadata, the citations in document order and the
//! modification times of the referenced bibliography and style files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde_json::{Map, Value};

use crate::convert::Document;
use crate::convert::document::{meta_text, tag};
use crate::utils::hash::KeyHasher;

/// Metadata keys the bibliography depends on, sorted.
pub const BIBLIOGRAPHY_KEYS: [&str; 5] =
    ["bibliography", "csl", "link-citations", "nocite", "references"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibFingerprint {
    /// Citations-only document handed to the converter.
    pub info: Option<String>,
    /// Externally visible bibliography id.
    pub id: Option<u64>,
    pub cwd: PathBuf,
}

impl BibFingerprint {
    /// Fingerprint of a document without a bibliography.
    pub fn none(cwd: impl Into<PathBuf>) -> Self {
        Self {
            info: None,
            id: None,
            cwd: cwd.into(),
        }
    }

    /// Derive the fingerprint of `doc` rendered in `cwd`.
    ///
    /// Reads file metadata, so call it off the async runtime.
    pub fn derive(doc: &Document, cwd: &Path) -> Self {
        let meta = doc.meta_subset(&BIBLIOGRAPHY_KEYS);
        if meta.is_empty() {
            return Self::none(cwd);
        }

        let mtimes = file_mtimes(&meta, cwd);
        let info = match doc.with_meta_json(&doc.citation_blocks(), &meta) {
            Ok(info) => info,
            Err(_) => return Self::none(cwd),
        };

        let id = KeyHasher::new()
            .part(&info)
            .part(&mtimes.to_string())
            .finish()
            .to_id();

        Self {
            info: Some(info),
            id: Some(id),
            cwd: cwd.to_path_buf(),
        }
    }
}

/// Modification times of the referenced bibliography and style files,
/// `null` for files that cannot be read.
fn file_mtimes(meta: &Map<String, Value>, cwd: &Path) -> Value {
    let bibliographies: Vec<Value> = meta
        .get("bibliography")
        .map(referenced_files)
        .unwrap_or_default()
        .iter()
        .map(|file| mtime(&cwd.join(file)))
        .collect();

    let csl = meta
        .get("csl")
        .and_then(meta_text)
        .map_or(Value::Null, |file| mtime(&cwd.join(file)));

    serde_json::json!({ "bibliography": bibliographies, "csl": csl })
}

/// File names from a `bibliography` value: a single string or a list.
fn referenced_files(value: &Value) -> Vec<String> {
    match tag(value) {
        Some("MetaList") => value["c"]
            .as_array()
            .map(|items| items.iter().filter_map(meta_text).collect())
            .unwrap_or_default(),
        _ => meta_text(value).into_iter().collect(),
    }
}

fn mtime(path: &Path) -> Value {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(Value::Null, |d| Value::from(d.as_secs_f64()))
}

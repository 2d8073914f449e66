//! On-disk JSON collections with merge-on-write dedup.
//!
//! Each collection is one pretty-printed JSON array. A merge loads the
//! existing array, appends the new records, drops structural duplicates, and
//! rewrites the file through a temp-file-then-rename so readers never see a
//! half-written collection.
//!
//! Dedup is by *full* structural equality: two records differing in any
//! field (a stock level that moved between runs, say) both survive. That
//! makes the collection an accumulating history, not an upsert target;
//! [`merge_by_identifier`] exists for callers who want the latter.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("existing collection at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("record cannot be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Merges `new_records` into the JSON array at `path` and rewrites it.
///
/// A missing file is an empty collection; the parent directory is created as
/// needed. Existing entries keep their positions, new distinct entries are
/// appended, and exact structural duplicates (across the whole merged set)
/// are dropped. Returns the size of the merged collection.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] when the existing file holds invalid JSON
/// (the file is left untouched), [`StoreError::Io`] on read/write/rename
/// failures, and [`StoreError::Serialize`] if a record cannot be converted
/// to JSON.
pub fn merge_and_save<T: Serialize>(new_records: &[T], path: &Path) -> Result<usize, StoreError> {
    let existing = load_collection(path)?;

    let mut seen: HashSet<[u8; 32]> = HashSet::new();
    let mut merged: Vec<Value> = Vec::with_capacity(existing.len() + new_records.len());

    for value in existing.into_iter().chain(to_values(new_records)?) {
        if seen.insert(structural_key(&value)) {
            merged.push(value);
        }
    }

    write_collection(&merged, path)?;
    tracing::info!(path = %path.display(), records = merged.len(), "collection saved");
    Ok(merged.len())
}

/// Merges `new_records` into the array at `path`, keyed by the string field
/// `id_field` instead of whole-record equality: a new record replaces the
/// existing record with the same identifier (newest wins, position kept);
/// records without the field fall back to structural dedup.
///
/// # Errors
///
/// Same taxonomy as [`merge_and_save`].
pub fn merge_by_identifier<T: Serialize>(
    new_records: &[T],
    path: &Path,
    id_field: &str,
) -> Result<usize, StoreError> {
    let existing = load_collection(path)?;

    let mut merged: Vec<Value> = Vec::with_capacity(existing.len() + new_records.len());
    let mut index_by_id: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<[u8; 32]> = HashSet::new();

    for value in existing.into_iter().chain(to_values(new_records)?) {
        let id = value
            .get(id_field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        match id {
            Some(id) => {
                if let Some(&idx) = index_by_id.get(&id) {
                    merged[idx] = value;
                } else {
                    index_by_id.insert(id, merged.len());
                    merged.push(value);
                }
            }
            None => {
                if seen.insert(structural_key(&value)) {
                    merged.push(value);
                }
            }
        }
    }

    write_collection(&merged, path)?;
    tracing::info!(path = %path.display(), records = merged.len(), "collection saved");
    Ok(merged.len())
}

fn to_values<T: Serialize>(records: &[T]) -> Result<Vec<Value>, StoreError> {
    records
        .iter()
        .map(|r| serde_json::to_value(r).map_err(StoreError::Serialize))
        .collect()
}

fn load_collection(path: &Path) -> Result<Vec<Value>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_owned(),
                source: e,
            })
        }
    };

    let value: Value = serde_json::from_str(&content).map_err(|e| StoreError::Parse {
        path: path.to_owned(),
        source: e,
    })?;

    match value {
        Value::Array(items) => Ok(items),
        // A non-array file is treated as a single-entry collection rather
        // than discarded.
        other => Ok(vec![other]),
    }
}

fn write_collection(records: &[Value], path: &Path) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut body = serde_json::to_vec_pretty(records).map_err(StoreError::Serialize)?;
    body.push(b'\n');

    // Write the whole body to a sibling temp file, then rename over the
    // target so a crash mid-write cannot truncate the collection.
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &body).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}

/// SHA-256 over the record's serialized form. `serde_json` maps are
/// key-sorted, so the serialization is canonical and key order in the
/// original document cannot affect the digest.
fn structural_key(value: &Value) -> [u8; 32] {
    let canonical = value.to_string();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hasher.finalize().into()
}
